use std::cell::RefCell;
use std::rc::Rc;

use scroll_shaders::frame::{FrameClock, FrameDriver, FrameHandle, FrameScheduler};
use scroll_shaders::VizError;

/// Records every request and cancel, like a spy on `requestAnimationFrame`.
#[derive(Default)]
struct SpyScheduler {
    next: i32,
    requested: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for SpyScheduler {
    fn request(&mut self) -> Result<FrameHandle, VizError> {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.requested.push(handle);
        Ok(handle)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

#[test]
fn teardown_cancels_pending_frame_and_stops_drawing() {
    let draws = Rc::new(RefCell::new(Vec::new()));
    let mut draw = {
        let draws = Rc::clone(&draws);
        move |now: f64| draws.borrow_mut().push(now)
    };

    let mut driver = FrameDriver::new(SpyScheduler::default(), FrameClock::unthrottled());
    driver.start().unwrap();
    for i in 1..=3 {
        driver.on_frame(i as f64 * 16.0, &mut draw).unwrap();
    }
    assert_eq!(draws.borrow().len(), 3);

    let pending = driver.pending().expect("a frame is queued while running");
    driver.stop();
    assert_eq!(driver.scheduler().cancelled, vec![pending]);
    assert!(driver.pending().is_none());

    // A callback the host had already dispatched still arrives; it must not draw.
    let requested = driver.scheduler().requested.len();
    driver.on_frame(100.0, &mut draw).unwrap();
    assert_eq!(draws.borrow().len(), 3);
    assert_eq!(driver.scheduler().requested.len(), requested);
}

#[test]
fn throttled_driver_skips_early_frames_but_keeps_scheduling() {
    let mut count = 0;
    let mut draw = |_: f64| count += 1;

    let mut driver = FrameDriver::new(SpyScheduler::default(), FrameClock::throttled(33.0));
    driver.start().unwrap();
    // 60 Hz host frames for ~one second.
    for i in 0..60 {
        driver.on_frame(i as f64 * 16.667, &mut draw).unwrap();
    }
    driver.stop();

    assert!((29..=31).contains(&count), "drew {count} frames");
    assert_eq!(driver.scheduler().requested.len(), 61);
}

#[test]
fn start_is_idempotent() {
    let mut driver = FrameDriver::new(SpyScheduler::default(), FrameClock::unthrottled());
    driver.start().unwrap();
    driver.start().unwrap();
    assert_eq!(driver.scheduler().requested.len(), 1);
    assert!(driver.is_running());
}

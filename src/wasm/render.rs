use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::error::VizError;
use crate::frame::{FrameClock, FrameDriver, FrameHandle, FrameScheduler};

// `callback` holds the animation-frame closure so that every frame can hand
// the same function back to `request_animation_frame`. Storing it inside an
// `Option` allows us to create the `Closure` after the driver that owns it.
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request(&mut self) -> Result<FrameHandle, VizError> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or(VizError::Allocation("frame callback"))?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        Ok(FrameHandle(id))
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancel_animation_frame failed: {:?}", err);
        }
    }
}

/// A running `requestAnimationFrame` loop. Stops when dropped.
pub struct AnimationLoop {
    driver: Rc<RefCell<FrameDriver<RafScheduler>>>,
}

impl AnimationLoop {
    pub fn start(
        window: &Window,
        clock: FrameClock,
        mut draw: impl FnMut(f64) + 'static,
    ) -> Result<Self, VizError> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            window: window.clone(),
            callback: Rc::clone(&callback),
        };
        let driver = Rc::new(RefCell::new(FrameDriver::new(scheduler, clock)));

        // The closure only holds a weak reference, so dropping the loop frees
        // the driver, the scheduler and with them the closure itself.
        let weak: Weak<RefCell<FrameDriver<RafScheduler>>> = Rc::downgrade(&driver);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let Some(driver) = weak.upgrade() else {
                return;
            };
            let result = driver.borrow_mut().on_frame(now, &mut draw);
            if let Err(err) = result {
                log::warn!("frame request failed: {err}");
            }
        }) as Box<dyn FnMut(f64)>));

        driver.borrow_mut().start()?;
        Ok(Self { driver })
    }

    pub fn stop(&self) {
        self.driver.borrow_mut().stop();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

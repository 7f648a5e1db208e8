use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use super::dom::{self, Listener};
use crate::error::VizError;
use crate::scroll::{
    hero_parallax, nav_scrolled, FrameDecision, ScrollConfig, ScrollThrottle, StickyShrink,
};

struct Parallax {
    window: Window,
    cfg: ScrollConfig,
    layers: [Option<HtmlElement>; 2],
    throttle: ScrollThrottle,
    pending: Option<i32>,
    frame: Option<Closure<dyn FnMut(f64)>>,
}

impl Parallax {
    fn request(&mut self) {
        let Some(frame) = &self.frame else {
            return;
        };
        match self.window.request_animation_frame(frame.as_ref().unchecked_ref()) {
            Ok(id) => self.pending = Some(id),
            Err(err) => {
                log::warn!("parallax frame not scheduled: {:?}", err);
                self.throttle.reset();
            }
        }
    }

    fn on_frame(&mut self, now_ms: f64) {
        self.pending = None;
        match self.throttle.on_frame(now_ms) {
            FrameDecision::Apply => self.apply(),
            FrameDecision::Defer => self.request(),
        }
    }

    // Writes straight to the elements' style; nothing else re-renders.
    fn apply(&self) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let (_, viewport_h) = dom::viewport_size(&self.window);
        let hero = hero_parallax(scroll_y, viewport_h, &self.cfg);
        for (i, layer) in self.layers.iter().enumerate() {
            let Some(el) = layer else { continue };
            dom::set_style(el, "transform", &format!("translate3d(0, {}px, 0)", hero.offsets[i]));
            dom::set_style(el, "opacity", &hero.opacities[i].to_string());
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancel_animation_frame failed: {:?}", err);
            }
        }
        self.throttle.reset();
    }
}

fn apply_sticky(
    section: &HtmlElement,
    title: &HtmlElement,
    subtitle: Option<&HtmlElement>,
    cfg: &ScrollConfig,
) {
    let shrink = StickyShrink::from_section_top(section.get_bounding_client_rect().top(), cfg);
    dom::set_style(title, "transform", &format!("scale({})", shrink.title_scale()));
    dom::set_style(title, "margin-bottom", &format!("{}px", shrink.margin_px(8.0)));
    if let Some(subtitle) = subtitle {
        dom::set_style(subtitle, "opacity", &shrink.subtitle_opacity().to_string());
        dom::set_style(subtitle, "transform", &format!("scale({})", shrink.subtitle_scale()));
        let max_height = if shrink.subtitle_collapsed() { "0px" } else { "" };
        dom::set_style(subtitle, "max-height", max_height);
    }
}

/// Scroll-linked presentation effects: hero parallax and fade, navigation
/// bar state, and shrinking sticky section headers.
#[wasm_bindgen]
pub struct ScrollEffects {
    parallax: Rc<RefCell<Parallax>>,
    listeners: Vec<Listener>,
    cfg: ScrollConfig,
}

#[wasm_bindgen]
impl ScrollEffects {
    /// Start tracking scroll. `hero` and `rotator` are the two parallax
    /// layers (fast and slow); `nav` gets the `scrolled` class past the
    /// threshold.
    pub fn mount(
        hero: Option<HtmlElement>,
        rotator: Option<HtmlElement>,
        nav: Option<HtmlElement>,
    ) -> Result<ScrollEffects, JsValue> {
        Ok(Self::try_mount([hero, rotator], nav, ScrollConfig::default())?)
    }

    /// Shrink `title` (and fade `subtitle`) once `section` reaches the viewport top.
    pub fn track_sticky(
        &mut self,
        section: HtmlElement,
        title: HtmlElement,
        subtitle: Option<HtmlElement>,
    ) -> Result<(), JsValue> {
        let window = dom::window()?;
        let cfg = self.cfg.clone();
        apply_sticky(&section, &title, subtitle.as_ref(), &cfg);
        let listener = Listener::new(&window, "scroll", true, move |_| {
            apply_sticky(&section, &title, subtitle.as_ref(), &cfg)
        })?;
        self.listeners.push(listener);
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.listeners.clear();
        let mut parallax = self.parallax.borrow_mut();
        parallax.cancel();
        parallax.frame = None;
    }
}

impl ScrollEffects {
    pub fn try_mount(
        layers: [Option<HtmlElement>; 2],
        nav: Option<HtmlElement>,
        cfg: ScrollConfig,
    ) -> Result<Self, VizError> {
        let window = dom::window()?;
        let parallax = Rc::new(RefCell::new(Parallax {
            window: window.clone(),
            throttle: ScrollThrottle::new(cfg.throttle_ms),
            cfg: cfg.clone(),
            layers,
            pending: None,
            frame: None,
        }));

        let weak: Weak<RefCell<Parallax>> = Rc::downgrade(&parallax);
        parallax.borrow_mut().frame = Some(Closure::wrap(Box::new(move |now: f64| {
            if let Some(parallax) = weak.upgrade() {
                parallax.borrow_mut().on_frame(now);
            }
        }) as Box<dyn FnMut(f64)>));

        let on_scroll = {
            let (window, parallax, cfg) = (window.clone(), Rc::clone(&parallax), cfg.clone());
            Listener::new(&window.clone(), "scroll", true, move |_| {
                let scroll_y = window.scroll_y().unwrap_or(0.0);
                if let Some(nav) = &nav {
                    let on = nav_scrolled(scroll_y, &cfg);
                    if let Err(err) = nav.class_list().toggle_with_force("scrolled", on) {
                        log::debug!("nav class not toggled: {:?}", err);
                    }
                }
                let mut parallax = parallax.borrow_mut();
                if parallax.throttle.on_scroll() {
                    parallax.request();
                }
            })?
        };

        Ok(Self {
            parallax,
            listeners: vec![on_scroll],
            cfg,
        })
    }
}

impl Drop for ScrollEffects {
    fn drop(&mut self) {
        self.unmount();
    }
}

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlElement, Window};

use crate::error::VizError;

pub fn window() -> Result<Window, VizError> {
    web_sys::window().ok_or(VizError::NoWindow)
}

/// Inner viewport size in CSS pixels.
pub fn viewport_size(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// An event listener that is removed from its target when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, VizError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {:?}", self.event, err);
        }
    }
}

/// Set a CSS property, logging instead of failing.
pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = el.style().set_property(property, value) {
        log::debug!("style {property} not applied: {:?}", err);
    }
}

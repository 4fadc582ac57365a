//! Browser document behind the controller's environment traits

use crate::describe_js;
use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, Window,
};
use wiki_chrome_core::dom::{GuardId, LeaveGuard, PageElement, PageEnvironment, TimerId};
use wiki_chrome_core::{ChromeError, ChromeResult};

#[derive(Clone)]
pub struct WebElement(Element);

impl WebElement {
    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }

    fn log_failure(&self, what: &str, result: Result<(), JsValue>) {
        if let Err(e) = result {
            tracing::warn!(id = %self.0.id(), what, error = %describe_js(&e), "DOM update failed");
        }
    }
}

impl PageElement for WebElement {
    fn style(&self, property: &str) -> String {
        self.html()
            .and_then(|element| element.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(element) = self.html() else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        self.log_failure(property, result);
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.log_failure(name, self.0.set_attribute(name, value));
    }

    fn remove_attribute(&self, name: &str) {
        self.log_failure(name, self.0.remove_attribute(name));
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn add_class(&self, class: &str) {
        self.log_failure(class, self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        self.log_failure(class, self.0.class_list().remove_1(class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else {
            self.set_attribute("value", value);
        }
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn on_transition_end(&self, callback: Box<dyn FnOnce()>) {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let listener = Closure::once_into_js(move || callback());
        let result = self
            .0
            .add_event_listener_with_callback_and_add_event_listener_options(
                "transitionend",
                listener.unchecked_ref(),
                &options,
            );
        self.log_failure("transitionend", result);
    }
}

/// The live document plus the leave guards registered against it
pub struct WebPage {
    window: Window,
    document: Document,
    guards: RefCell<Vec<(GuardId, LeaveGuard)>>,
    next_guard: Cell<u32>,
    /// Set when the user already agreed to leave, via a link click or
    /// verify-leave
    leave_confirmed: Cell<bool>,
}

impl WebPage {
    pub fn new(window: Window) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        Ok(Self {
            window,
            document,
            guards: RefCell::new(Vec::new()),
            next_guard: Cell::new(1),
            leave_confirmed: Cell::new(false),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// First prompt raised by a leave guard, if any
    pub fn leave_message(&self) -> Option<String> {
        let guards: Vec<LeaveGuard> = self
            .guards
            .borrow()
            .iter()
            .map(|(_, guard)| guard.clone())
            .collect();
        guards.iter().find_map(|guard| guard())
    }

    /// Consume a confirmation given on the click that started this unload
    pub fn take_leave_confirmed(&self) -> bool {
        self.leave_confirmed.replace(false)
    }
}

impl PageEnvironment for WebPage {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query_selector(&self, selector: &str) -> Option<WebElement> {
        match self.document.query_selector(selector) {
            Ok(element) => element.map(WebElement),
            Err(e) => {
                tracing::warn!(selector, error = %describe_js(&e), "invalid selector");
                None
            }
        }
    }

    fn submit_first_form(&self) -> ChromeResult<bool> {
        let Some(form) = self.document.forms().item(0) else {
            return Ok(false);
        };
        let form = form
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| ChromeError::Form("first form is not a <form>".to_string()))?;
        form.submit()
            .map_err(|e| ChromeError::Form(describe_js(&e)))?;
        Ok(true)
    }

    fn matches_min_width(&self, width_px: u32) -> bool {
        let query = format!("(min-width: {}px)", width_px);
        match self.window.match_media(&query) {
            Ok(Some(list)) => list.matches(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(query = %query, error = %describe_js(&e), "media query failed");
                false
            }
        }
    }

    fn add_leave_guard(&self, guard: LeaveGuard) -> GuardId {
        let id = GuardId(self.next_guard.get());
        self.next_guard.set(id.0 + 1);
        self.guards.borrow_mut().push((id, guard));
        id
    }

    fn remove_leave_guard(&self, id: GuardId) {
        self.guards.borrow_mut().retain(|(guard_id, _)| *guard_id != id);
    }

    fn mark_leave_confirmed(&self) {
        self.leave_confirmed.set(true);
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ChromeResult<TimerId> {
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .map(TimerId)
            .map_err(|e| ChromeError::Scheduler(describe_js(&e)))
    }

    fn clear_timeout(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}

//! Wiki Chrome UI - browser bindings for the page-chrome controller
//!
//! Loads alongside the wiki templates, builds a [`PageChromeController`]
//! over the live document, session storage and TinyMCE, and hands it to the
//! bridge that listens for page events and serves the inline `onclick`
//! handlers.

pub mod bridge;
pub mod browser;
pub mod config;
pub mod dom;
pub mod storage;
pub mod tinymce;

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wiki_chrome_core::{ChromeServices, PageChromeController};

pub use dom::{WebElement, WebPage};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    web_sys::console::log_1(&"=== WIKI CHROME WASM LOADED ===".into());

    if let Err(e) = mount() {
        tracing::error!(error = %describe_js(&e), "failed to mount page chrome");
    }
}

/// Build the controller for the current page and install the bridge
pub fn mount() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let page = Rc::new(WebPage::new(window.clone())?);
    let config = config::load_config(page.document());

    let session = storage::BrowserSession::new(&window)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let browser = Rc::new(browser::BrowserWindow::new(window.clone()));
    let services = ChromeServices {
        session: Rc::new(session),
        editor: Rc::new(tinymce::TinyMce::new(window)),
        dialog: browser.clone(),
        navigator: browser,
    };

    let controller = Rc::new(PageChromeController::new(page.clone(), services, config));
    bridge::install(controller, page)
}

/// Best-effort text for a thrown JS value
pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

//! Page Bridge - connects browser events and inline handlers to the
//! controller
//!
//! Architecture:
//! ```text
//! DOMContentLoaded ─┐
//! resize ───────────┼──► PageChromeController
//! load ─────────────┘            ▲
//! onclick="toggleDrawer()" ──────┘  (window globals)
//!
//! beforeunload / link click ──► WebPage leave guards ──► native prompt
//! ```

use crate::describe_js;
use crate::dom::WebPage;
use js_sys::Reflect;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Element, Event, EventTarget, HtmlAnchorElement, Window};
use wiki_chrome_core::{ChromeResult, PageChromeController, PageEnvironment};

type Controller = PageChromeController<WebPage>;

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<Controller>>> = RefCell::new(None);
}

/// Wire the controller into the page
/// Called once from the wasm entry point
pub fn install(controller: Rc<Controller>, page: Rc<WebPage>) -> Result<(), JsValue> {
    let already_installed = CONTROLLER.with(|slot| slot.borrow().is_some());
    if already_installed {
        tracing::debug!("page bridge already installed");
        return Ok(());
    }
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller.clone()));

    install_leave_listeners(&page)?;
    install_page_listeners(&controller, &page)?;
    publish_globals(page.window())?;

    tracing::info!("page bridge installed");
    Ok(())
}

fn with_controller<R>(f: impl FnOnce(&Controller) -> R) -> Option<R> {
    let controller = CONTROLLER.with(|slot| slot.borrow().clone());
    match controller {
        Some(controller) => Some(f(&controller)),
        None => {
            tracing::warn!("page chrome used before install");
            None
        }
    }
}

fn report(operation: &str, result: ChromeResult<()>) {
    if let Err(e) = result {
        tracing::error!(operation, error = %e, "page chrome operation failed");
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    callback: Closure<dyn FnMut(Event)>,
) -> Result<(), JsValue> {
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    callback.forget();
    Ok(())
}

fn ready_state(page: &WebPage) -> String {
    Reflect::get(page.document(), &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .unwrap_or_default()
}

// =============================================================================
// LEAVE GUARDS
// =============================================================================

fn install_leave_listeners(page: &Rc<WebPage>) -> Result<(), JsValue> {
    let unload_page = page.clone();
    let on_unload = Closure::wrap(Box::new(move |event: Event| {
        if unload_page.take_leave_confirmed() {
            return;
        }
        if let Some(message) = unload_page.leave_message() {
            event.prevent_default();
            if let Some(event) = event.dyn_ref::<BeforeUnloadEvent>() {
                event.set_return_value(&message);
            }
        }
    }) as Box<dyn FnMut(Event)>);
    listen(page.window(), "beforeunload", on_unload)?;

    let click_page = page.clone();
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        let link = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| element.closest("a[href]").ok().flatten())
            .and_then(|element| element.dyn_into::<HtmlAnchorElement>().ok());
        let Some(link) = link else {
            return;
        };
        let current = click_page.window().location().href().unwrap_or_default();
        let target = link.target();
        if !leaves_document(&link.href(), &current, &target, link.has_attribute("download")) {
            return;
        }
        let Some(message) = click_page.leave_message() else {
            return;
        };
        match click_page.window().confirm_with_message(&message) {
            Ok(true) => click_page.mark_leave_confirmed(),
            Ok(false) => event.prevent_default(),
            Err(e) => tracing::warn!(error = %describe_js(&e), "leave prompt failed"),
        }
    }) as Box<dyn FnMut(Event)>);
    listen(page.window(), "click", on_click)
}

/// Whether following a link unloads the current document
///
/// Fragment jumps, `javascript:` links, downloads and links opening another
/// browsing context leave the page in place.
fn leaves_document(href: &str, current: &str, target: &str, download: bool) -> bool {
    if download {
        return false;
    }
    let target = target.trim();
    if !target.is_empty() && !target.eq_ignore_ascii_case("_self") {
        return false;
    }
    let href = href.trim();
    if href.is_empty() || href.to_ascii_lowercase().starts_with("javascript:") {
        return false;
    }
    match href.split_once('#') {
        Some((page, _)) => page != current.split('#').next().unwrap_or_default(),
        None => true,
    }
}

// =============================================================================
// PAGE LIFECYCLE
// =============================================================================

fn install_page_listeners(controller: &Rc<Controller>, page: &Rc<WebPage>) -> Result<(), JsValue> {
    // The module usually finishes loading after DOMContentLoaded has fired
    if ready_state(page) == "loading" {
        let on_ready = controller.clone();
        let callback = Closure::wrap(Box::new(move |_: Event| {
            report("reconcileOnLoad", on_ready.reconcile_on_load());
        }) as Box<dyn FnMut(Event)>);
        listen(page.document(), "DOMContentLoaded", callback)?;
    } else {
        report("reconcileOnLoad", controller.reconcile_on_load());
    }

    let on_resize = controller.clone();
    let callback = Closure::wrap(Box::new(move |_: Event| {
        report("reconcileOnResize", on_resize.reconcile_on_resize());
    }) as Box<dyn FnMut(Event)>);
    listen(page.window(), "resize", callback)?;

    if ready_state(page) == "complete" {
        controller.dismiss_page_loader();
    } else {
        let on_load = controller.clone();
        let callback = Closure::wrap(Box::new(move |_: Event| {
            on_load.dismiss_page_loader();
        }) as Box<dyn FnMut(Event)>);
        listen(page.window(), "load", callback)?;
    }
    Ok(())
}

// =============================================================================
// INLINE HANDLER GLOBALS
// =============================================================================

fn publish(window: &Window, name: &str, handler: fn() -> JsValue) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn() -> JsValue>);
    Reflect::set(window, &JsValue::from_str(name), closure.as_ref())?;
    closure.forget();
    Ok(())
}

/// Expose the controller under the names the templates' `onclick`
/// attributes call
fn publish_globals(window: &Window) -> Result<(), JsValue> {
    publish(window, "toggleEditor", || {
        with_controller(|c| report("toggleEditor", c.toggle_editor()));
        JsValue::UNDEFINED
    })?;
    publish(window, "toggleForm", || {
        with_controller(|c| c.toggle_form());
        JsValue::UNDEFINED
    })?;
    publish(window, "toggleSave", || {
        with_controller(|c| c.toggle_save());
        JsValue::UNDEFINED
    })?;
    publish(window, "togglePage", || {
        with_controller(|c| c.toggle_page());
        JsValue::UNDEFINED
    })?;
    publish(window, "verifyLeaveFunction", || {
        let leaving = with_controller(|c| match c.verify_leave() {
            Ok(leaving) => leaving,
            Err(e) => {
                tracing::error!(error = %e, "verify leave failed");
                false
            }
        });
        JsValue::from_bool(leaving.unwrap_or(false))
    })?;
    publish(window, "uploadPageFromEditor", || {
        with_controller(|c| report("uploadPageFromEditor", c.upload_from_editor()));
        JsValue::UNDEFINED
    })?;
    publish(window, "toggleDrawer", || {
        with_controller(|c| report("toggleDrawer", c.toggle_drawer()));
        JsValue::UNDEFINED
    })?;
    publish(window, "toggleWikiPageMargin", || {
        with_controller(|c| c.toggle_wiki_margin());
        JsValue::UNDEFINED
    })?;
    publish(window, "myFunction", || {
        with_controller(|c| report("myFunction", c.schedule_tree_map_reveal()));
        JsValue::UNDEFINED
    })?;
    publish(window, "showPage", || {
        with_controller(|c| c.reveal_tree_map());
        JsValue::UNDEFINED
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://wiki.example/pages/home";

    #[test]
    fn test_links_to_other_pages_leave() {
        assert!(leaves_document("https://wiki.example/pages/other", PAGE, "", false));
        assert!(leaves_document("https://wiki.example/pages/other", PAGE, "_self", false));
        assert!(leaves_document("https://wiki.example/pages/other#top", PAGE, "", false));
    }

    #[test]
    fn test_fragment_jump_stays() {
        let here = format!("{}#history", PAGE);
        assert!(!leaves_document(&format!("{}#section", PAGE), PAGE, "", false));
        assert!(!leaves_document(&format!("{}#section", PAGE), &here, "", false));
    }

    #[test]
    fn test_script_new_tab_and_download_links_stay() {
        assert!(!leaves_document("javascript:void(0)", PAGE, "", false));
        assert!(!leaves_document("JavaScript:toggleDrawer()", PAGE, "", false));
        assert!(!leaves_document("https://wiki.example/pages/other", PAGE, "_blank", false));
        assert!(!leaves_document("https://wiki.example/files/a.pdf", PAGE, "", true));
    }
}

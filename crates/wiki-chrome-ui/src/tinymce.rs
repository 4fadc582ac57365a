//! TinyMCE as the controller's editor capability
//!
//! The editor library is a page-level global (`window.tinymce`); every call
//! goes through `js_sys::Reflect` so the crate has no compile-time binding
//! to it.

use crate::describe_js;
use js_sys::{Array, Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;
use wiki_chrome_core::{
    ChromeError, ChromeResult, EditorCapability, EditorHandle, EditorSettings, EditorSetup,
};

fn invoke(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    Reflect::apply(&function, target, args)
}

fn editor_error(e: JsValue) -> ChromeError {
    ChromeError::Editor(describe_js(&e))
}

pub struct TinyMce {
    window: Window,
}

impl TinyMce {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn global(&self) -> ChromeResult<JsValue> {
        let tinymce =
            Reflect::get(&self.window, &JsValue::from_str("tinymce")).map_err(editor_error)?;
        if tinymce.is_undefined() || tinymce.is_null() {
            return Err(ChromeError::Editor("tinymce is not loaded".to_string()));
        }
        Ok(tinymce)
    }
}

impl EditorCapability for TinyMce {
    /// `setup` runs once the editor has loaded its content, so the content
    /// it sees is what the user started from
    fn init(&self, settings: &EditorSettings, setup: EditorSetup) -> ChromeResult<()> {
        let tinymce = self.global()?;
        let options = serde_wasm_bindgen::to_value(&settings.init_options())
            .map_err(|e| ChromeError::Editor(e.to_string()))?;

        let on_setup = Closure::once_into_js(move |editor: JsValue| {
            let handle = Rc::new(TinyMceEditor {
                editor: editor.clone(),
            });
            let on_init = Closure::once_into_js(move || setup(handle as Rc<dyn EditorHandle>));
            let args = Array::of2(&JsValue::from_str("init"), &on_init);
            if let Err(e) = invoke(&editor, "on", &args) {
                tracing::error!(error = %describe_js(&e), "could not hook editor init");
            }
        });
        Reflect::set(&options, &JsValue::from_str("setup"), &on_setup).map_err(editor_error)?;

        invoke(&tinymce, "init", &Array::of1(&options)).map_err(editor_error)?;
        Ok(())
    }

    fn remove(&self) -> ChromeResult<()> {
        invoke(&self.global()?, "remove", &Array::new()).map_err(editor_error)?;
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Rc<dyn EditorHandle>> {
        let tinymce = self.global().ok()?;
        let editor = invoke(&tinymce, "get", &Array::of1(&JsValue::from_str(id))).ok()?;
        if editor.is_undefined() || editor.is_null() {
            return None;
        }
        Some(Rc::new(TinyMceEditor { editor }))
    }
}

struct TinyMceEditor {
    editor: JsValue,
}

impl EditorHandle for TinyMceEditor {
    fn content(&self) -> String {
        invoke(&self.editor, "getContent", &Array::new())
            .ok()
            .and_then(|content| content.as_string())
            .unwrap_or_default()
    }

    fn set_content(&self, html: &str) {
        let args = Array::of1(&JsValue::from_str(html));
        if let Err(e) = invoke(&self.editor, "setContent", &args) {
            tracing::warn!(error = %describe_js(&e), "editor rejected content");
        }
    }

    fn is_dirty(&self) -> bool {
        invoke(&self.editor, "isDirty", &Array::new())
            .ok()
            .and_then(|dirty| dirty.as_bool())
            .unwrap_or(false)
    }
}

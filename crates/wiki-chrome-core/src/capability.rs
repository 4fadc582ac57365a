//! Injected capabilities: session storage, the rich-text editor, the
//! blocking confirmation dialog and page navigation.

use crate::config::EditorSettings;
use crate::error::ChromeResult;
use std::rc::Rc;

/// Key/value strings scoped to the browsing session
pub trait SessionStore {
    fn get(&self, key: &str) -> ChromeResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ChromeResult<()>;
    fn remove(&self, key: &str) -> ChromeResult<()>;
}

/// A live editor instance
pub trait EditorHandle {
    fn content(&self) -> String;
    fn set_content(&self, html: &str);
    /// Editor's own record of unsaved edits
    fn is_dirty(&self) -> bool;
}

/// Called once with the editor created by [`EditorCapability::init`]
pub type EditorSetup = Box<dyn FnOnce(Rc<dyn EditorHandle>)>;

/// The external rich-text editor library
pub trait EditorCapability {
    fn init(&self, settings: &EditorSettings, setup: EditorSetup) -> ChromeResult<()>;
    /// Tear down every editor instance
    fn remove(&self) -> ChromeResult<()>;
    fn get(&self, id: &str) -> Option<Rc<dyn EditorHandle>>;
}

/// Blocking yes/no prompt
pub trait ConfirmDialog {
    fn confirm(&self, message: &str) -> ChromeResult<bool>;
}

pub trait Navigator {
    fn reload(&self) -> ChromeResult<()>;
    fn back(&self) -> ChromeResult<()>;
}

/// Everything the controller needs besides the document itself
#[derive(Clone)]
pub struct ChromeServices {
    pub session: Rc<dyn SessionStore>,
    pub editor: Rc<dyn EditorCapability>,
    pub dialog: Rc<dyn ConfirmDialog>,
    pub navigator: Rc<dyn Navigator>,
}

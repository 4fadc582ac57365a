//! Native confirm dialog and page navigation

use crate::describe_js;
use web_sys::Window;
use wiki_chrome_core::{ChromeError, ChromeResult, ConfirmDialog, Navigator};

pub struct BrowserWindow {
    window: Window,
}

impl BrowserWindow {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ConfirmDialog for BrowserWindow {
    fn confirm(&self, message: &str) -> ChromeResult<bool> {
        self.window
            .confirm_with_message(message)
            .map_err(|e| ChromeError::Dialog(describe_js(&e)))
    }
}

impl Navigator for BrowserWindow {
    fn reload(&self) -> ChromeResult<()> {
        self.window
            .location()
            .reload()
            .map_err(|e| ChromeError::Navigation(describe_js(&e)))
    }

    fn back(&self) -> ChromeResult<()> {
        self.window
            .history()
            .and_then(|history| history.back())
            .map_err(|e| ChromeError::Navigation(describe_js(&e)))
    }
}

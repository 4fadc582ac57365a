//! `window.sessionStorage` as the controller's session store

use crate::describe_js;
use web_sys::{Storage, Window};
use wiki_chrome_core::{ChromeError, ChromeResult, SessionStore};

pub struct BrowserSession {
    storage: Storage,
}

impl BrowserSession {
    pub fn new(window: &Window) -> ChromeResult<Self> {
        let storage = window
            .session_storage()
            .map_err(|e| ChromeError::Storage(describe_js(&e)))?
            .ok_or_else(|| ChromeError::Storage("sessionStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> ChromeResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| ChromeError::Storage(describe_js(&e)))
    }

    fn set(&self, key: &str, value: &str) -> ChromeResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ChromeError::Storage(describe_js(&e)))
    }

    fn remove(&self, key: &str) -> ChromeResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| ChromeError::Storage(describe_js(&e)))
    }
}

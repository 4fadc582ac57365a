//! Page Session Flags
//!
//! Typed access to the two flags that survive a page load: whether the
//! drawer is open, and whether a save is on its way to the server.

use crate::capability::SessionStore;
use crate::error::ChromeResult;
use std::rc::Rc;

pub const DRAWER_OPEN_KEY: &str = "drawerOpen";
pub const SAVE_PAGE_KEY: &str = "savePage";
/// Older templates read the save marker under this name
pub const LEGACY_SAVE_PAGE_KEY: &str = "pageSave";

const TRUE: &str = "true";
const FALSE: &str = "false";

#[derive(Clone)]
pub struct PageSession {
    store: Rc<dyn SessionStore>,
}

impl PageSession {
    pub fn new(store: Rc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Stored drawer state; `None` when never written or unreadable
    pub fn drawer_open(&self) -> ChromeResult<Option<bool>> {
        Ok(match self.store.get(DRAWER_OPEN_KEY)?.as_deref() {
            Some(TRUE) => Some(true),
            Some(FALSE) => Some(false),
            Some(other) => {
                tracing::debug!(value = other, "ignoring unrecognised drawerOpen value");
                None
            }
            None => None,
        })
    }

    pub fn set_drawer_open(&self, open: bool) -> ChromeResult<()> {
        self.store
            .set(DRAWER_OPEN_KEY, if open { TRUE } else { FALSE })
    }

    pub fn save_in_progress(&self) -> ChromeResult<bool> {
        for key in [SAVE_PAGE_KEY, LEGACY_SAVE_PAGE_KEY] {
            if self.store.get(key)?.as_deref() == Some(TRUE) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn mark_save_in_progress(&self) -> ChromeResult<()> {
        self.store.set(SAVE_PAGE_KEY, TRUE)
    }

    /// Drop the save marker once the page it was guarding has been replaced
    pub fn clear_save_in_progress(&self) -> ChromeResult<()> {
        self.store.remove(SAVE_PAGE_KEY)?;
        self.store.remove(LEGACY_SAVE_PAGE_KEY)
    }
}

//! Wiki Chrome Core - page-chrome controller for the wiki frontend
//!
//! Owns the visibility state of one rendered page: the editor, create-page
//! and save panels, the navigation drawer and its session flag, and the
//! loading screens. The browser is reached only through the traits in
//! [`dom`] and [`capability`], so everything here runs natively against
//! the in-memory page in `wiki-chrome-harness`.

pub mod capability;
pub mod config;
pub mod controller;
pub mod dom;
pub mod drawer;
pub mod error;
mod loader;
pub mod session;

pub use capability::{
    ChromeServices, ConfirmDialog, EditorCapability, EditorHandle, EditorSetup, Navigator,
    SessionStore,
};
pub use config::{ChromeConfig, EditorSettings, LeaveAction};
pub use controller::PageChromeController;
pub use dom::{Display, GuardId, LeaveGuard, PageElement, PageEnvironment, TimerId};
pub use error::{ChromeError, ChromeResult};
pub use session::PageSession;

//! Error types for page-chrome operations
//!
//! Missing DOM elements are not errors: every lookup is optional and an
//! absent element turns the operation into a no-op. Errors are reserved for
//! capabilities that were present but refused the call.

use thiserror::Error;

/// Failure reported by one of the injected page capabilities
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChromeError {
    #[error("Session storage failure: {0}")]
    Storage(String),

    #[error("Editor failure: {0}")]
    Editor(String),

    #[error("Form submission failed: {0}")]
    Form(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Confirmation dialog failed: {0}")]
    Dialog(String),

    #[error("Timer could not be scheduled: {0}")]
    Scheduler(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for page-chrome operations
pub type ChromeResult<T> = Result<T, ChromeError>;

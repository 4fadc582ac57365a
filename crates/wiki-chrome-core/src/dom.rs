//! DOM contract and the environment seam
//!
//! The controller never touches `document` or `window` directly. It asks a
//! [`PageEnvironment`] for elements by id or selector and gets `None` back
//! when the current template does not render them.

use crate::error::ChromeResult;
use std::rc::Rc;

// =============================================================================
// ELEMENT IDS / SELECTORS
// =============================================================================

pub const EDITOR_CONTAINER_ID: &str = "editor-container";
pub const UPLOAD_BOX_ID: &str = "upload-box-box";
pub const FORM_CONTAINER_ID: &str = "form-container";
pub const TOGGLE_BUTTON_ID: &str = "toggleButton";
pub const SAVE_CONTAINER_ID: &str = "save-button-container";
pub const PAGE_DATA_CONTAINER_ID: &str = "page-data-container";
pub const DRAWER_ID: &str = "pageDrawer";
pub const CONTENT_INPUT_ID: &str = "contentInput";
pub const TREE_MAP_LOADER_ID: &str = "loader";
pub const TREE_MAP_CONTAINER_ID: &str = "myDiv";

pub const WIKI_PAGE_SELECTOR: &str = ".wiki-page";
pub const LAYOUT_ROOT_SELECTOR: &str = ".unique-element";
pub const PAGE_LOADER_SELECTOR: &str = ".loader";

/// Marker on the layout root: this template opens the drawer by default
pub const DEFAULT_DRAWER_OPEN_ATTR: &str = "data-default-drawer-open";

pub const BACK_BUTTON_CLASS: &str = "upload-button-back";
pub const LOADER_HIDDEN_CLASS: &str = "loader-hidden";

/// Inline handler attached to the toggle button while page data is hidden
pub const VERIFY_LEAVE_HANDLER: &str = "verifyLeaveFunction()";

pub const DISPLAY: &str = "display";
pub const MARGIN_TOP: &str = "margin-top";
pub const MARGIN_LEFT: &str = "margin-left";

// =============================================================================
// DISPLAY STATE
// =============================================================================

/// Inline `display` value of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    None,
    /// No inline value (or one the page scripts never write)
    Unset,
}

impl Display {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "block" => Display::Block,
            "none" => Display::None,
            _ => Display::Unset,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::None => "none",
            Display::Unset => "",
        }
    }

    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Display::Block
        } else {
            Display::None
        }
    }
}

/// How a toggle reads a panel with no inline `display`
///
/// The templates differ: the editor and save panels are shown unless
/// explicitly hidden, the other panels are hidden unless explicitly shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetMeans {
    Shown,
    Hidden,
}

impl UnsetMeans {
    pub fn is_visible(&self, display: Display) -> bool {
        match display {
            Display::Block => true,
            Display::None => false,
            Display::Unset => *self == UnsetMeans::Shown,
        }
    }
}

// =============================================================================
// ENVIRONMENT TRAITS
// =============================================================================

/// Handle for a leave guard registered with the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardId(pub u32);

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Consulted before the page is left; `Some(message)` asks the browser to
/// prompt the user
pub type LeaveGuard = Rc<dyn Fn() -> Option<String>>;

/// A rendered element. Handles are cheap clones of the same node.
pub trait PageElement: Clone + 'static {
    /// Inline style property (kebab-case); empty when unset
    fn style(&self, property: &str) -> String;
    fn set_style(&self, property: &str, value: &str);

    fn has_attribute(&self, name: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);

    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    /// Form control value
    fn set_value(&self, value: &str);

    /// Detach the element from the document
    fn remove(&self);

    /// Run `callback` once, after the element's next CSS transition ends
    fn on_transition_end(&self, callback: Box<dyn FnOnce()>);

    fn display(&self) -> Display {
        Display::parse(&self.style(DISPLAY))
    }

    fn set_display(&self, display: Display) {
        self.set_style(DISPLAY, display.as_css());
    }
}

/// The document and window as the controller sees them
pub trait PageEnvironment: 'static {
    type Element: PageElement;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First element matching a CSS selector
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Submit the first form in the document; `Ok(false)` when there is none
    fn submit_first_form(&self) -> ChromeResult<bool>;

    /// Whether the viewport is at least `width_px` wide
    fn matches_min_width(&self, width_px: u32) -> bool;

    /// Consult `guard` on tab close and on navigation clicks
    fn add_leave_guard(&self, guard: LeaveGuard) -> GuardId;
    fn remove_leave_guard(&self, id: GuardId);

    /// The user already agreed to leave; the unload that follows must not
    /// ask again
    fn mark_leave_confirmed(&self);

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ChromeResult<TimerId>;
    fn clear_timeout(&self, id: TimerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse() {
        assert_eq!(Display::parse("block"), Display::Block);
        assert_eq!(Display::parse("none"), Display::None);
        assert_eq!(Display::parse(""), Display::Unset);
        assert_eq!(Display::parse("flex"), Display::Unset);
    }

    #[test]
    fn test_unset_means() {
        assert!(UnsetMeans::Shown.is_visible(Display::Unset));
        assert!(!UnsetMeans::Hidden.is_visible(Display::Unset));
        assert!(UnsetMeans::Hidden.is_visible(Display::Block));
        assert!(!UnsetMeans::Shown.is_visible(Display::None));
    }
}

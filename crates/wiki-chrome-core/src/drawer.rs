//! Drawer reconciliation rules
//!
//! Pure decisions: given the template marker, the stored flag and the
//! viewport, what should the drawer and the page margin look like.

/// What to do with `.wiki-page`'s left margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginChange {
    Indent,
    Reset,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerLayout {
    pub visible: bool,
    pub margin: MarginChange,
}

/// Layout applied when the page first renders
///
/// Without the marker the drawer starts closed whatever the session says.
/// With it, only an explicit stored "false" keeps the drawer closed.
pub fn initial_layout(marker_present: bool, stored_open: Option<bool>) -> DrawerLayout {
    match (marker_present, stored_open) {
        (true, Some(false)) => DrawerLayout {
            visible: false,
            margin: MarginChange::Reset,
        },
        (true, _) => DrawerLayout {
            visible: true,
            margin: MarginChange::Indent,
        },
        (false, _) => DrawerLayout {
            visible: false,
            margin: MarginChange::Keep,
        },
    }
}

/// Whether a resize must flip the drawer
///
/// Wide viewports default to open, narrow ones to closed. Only a stored
/// flag that explicitly contradicts the default triggers a flip, so once
/// flipped the flag agrees and further resize events on the same side of
/// the breakpoint do nothing.
pub fn resize_needs_toggle(marker_present: bool, wide: bool, stored_open: Option<bool>) -> bool {
    marker_present && stored_open == Some(!wide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_without_flag_opens_drawer() {
        let layout = initial_layout(true, None);
        assert!(layout.visible);
        assert_eq!(layout.margin, MarginChange::Indent);
    }

    #[test]
    fn test_marker_with_true_opens_drawer() {
        assert!(initial_layout(true, Some(true)).visible);
    }

    #[test]
    fn test_marker_with_false_closes_drawer() {
        let layout = initial_layout(true, Some(false));
        assert!(!layout.visible);
        assert_eq!(layout.margin, MarginChange::Reset);
    }

    #[test]
    fn test_no_marker_ignores_flag() {
        for stored in [None, Some(true), Some(false)] {
            let layout = initial_layout(false, stored);
            assert!(!layout.visible);
            assert_eq!(layout.margin, MarginChange::Keep);
        }
    }

    #[test]
    fn test_resize_toggle_only_on_contradiction() {
        assert!(resize_needs_toggle(true, true, Some(false)));
        assert!(resize_needs_toggle(true, false, Some(true)));

        assert!(!resize_needs_toggle(true, true, Some(true)));
        assert!(!resize_needs_toggle(true, false, Some(false)));
        assert!(!resize_needs_toggle(true, true, None));
        assert!(!resize_needs_toggle(true, false, None));
        assert!(!resize_needs_toggle(false, false, Some(true)));
    }
}

//! Page-chrome configuration
//!
//! Every field has a default matching the markup the wiki templates ship
//! with, so an empty document (`{}` or `---`) is a valid configuration.

use crate::error::{ChromeError, ChromeResult};
use serde::{Deserialize, Serialize};

/// Root configuration for the page-chrome controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub layout: LayoutConfig,
    pub editor: EditorSettings,
    pub navigation: NavigationConfig,
    pub tree_map: TreeMapConfig,
    pub labels: LabelConfig,
}

impl ChromeConfig {
    /// Parse a configuration from YAML
    pub fn from_yaml_str(content: &str) -> ChromeResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ChromeError::Config(e.to_string()))
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(content: &str) -> ChromeResult<Self> {
        serde_json::from_str(content).map_err(|e| ChromeError::Config(e.to_string()))
    }
}

/// Pixel values used by the layout toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width at or above which the drawer defaults to open
    pub drawer_breakpoint_px: u32,
    /// Left margin of `.wiki-page` while the drawer is open
    pub drawer_indent_px: u32,
    /// Top margin of the upload box while the create form is shown
    pub form_margin_expanded_px: u32,
    /// Top margin of the upload box while the create form is hidden
    pub form_margin_collapsed_px: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            drawer_breakpoint_px: 1018,
            drawer_indent_px: 250,
            form_margin_expanded_px: 200,
            form_margin_collapsed_px: 40,
        }
    }
}

impl LayoutConfig {
    pub fn drawer_indent(&self) -> String {
        px(self.drawer_indent_px)
    }

    pub fn form_margin_expanded(&self) -> String {
        px(self.form_margin_expanded_px)
    }

    pub fn form_margin_collapsed(&self) -> String {
        px(self.form_margin_collapsed_px)
    }
}

/// Format a pixel length the way `CSSStyleDeclaration` reports it
pub fn px(value: u32) -> String {
    format!("{}px", value)
}

/// Rich-text editor settings handed to the editor capability on init
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// CSS selector of the textarea the editor replaces
    pub selector: String,
    pub height: u32,
    pub plugins: Vec<String>,
    /// Toolbar buttons, grouped; groups render with a separator between them
    pub toolbar: Vec<Vec<String>>,
}

const DEFAULT_PLUGINS: &[&str] = &[
    "anchor",
    "autolink",
    "charmap",
    "codesample",
    "image",
    "link",
    "lists",
    "media",
    "searchreplace",
    "table",
    "visualblocks",
    "wordcount",
];

const DEFAULT_TOOLBAR: &[&[&str]] = &[
    &["export"],
    &["undo", "redo"],
    &["blocks", "fontfamily", "fontsize"],
    &["bold", "italic", "underline", "strikethrough"],
    &["link", "image", "media", "table"],
    &["addcomment", "showcomments"],
    &["spellcheckdialog", "a11ycheck"],
    &["align", "lineheight"],
    &["checklist", "numlist", "bullist", "indent", "outdent"],
    &["emoticons", "charmap"],
    &["removeformat"],
];

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            selector: "#myTextarea".to_string(),
            height: 1000,
            plugins: DEFAULT_PLUGINS.iter().map(|p| p.to_string()).collect(),
            toolbar: DEFAULT_TOOLBAR
                .iter()
                .map(|group| group.iter().map(|b| b.to_string()).collect())
                .collect(),
        }
    }
}

impl EditorSettings {
    /// Editor instance id: the selector without its leading `#`
    pub fn editor_id(&self) -> &str {
        self.selector.trim_start_matches('#')
    }

    /// Flatten into the option object the editor library expects
    pub fn init_options(&self) -> EditorInitOptions {
        EditorInitOptions {
            height: self.height,
            selector: self.selector.clone(),
            plugins: self.plugins.join(" "),
            toolbar: self
                .toolbar
                .iter()
                .filter(|group| !group.is_empty())
                .map(|group| group.join(" "))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// Wire shape of the editor init options (minus the setup callback)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorInitOptions {
    pub height: u32,
    pub selector: String,
    pub plugins: String,
    pub toolbar: String,
}

/// What verify-leave does once leaving is allowed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveAction {
    /// Re-fetch the current page, dropping the editor
    #[default]
    Reload,
    /// Go back one entry in session history
    Back,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub leave_action: LeaveAction,
    /// Returned to the browser's unload prompt while the editor has edits
    pub unsaved_changes_message: String,
    /// Asked by verify-leave before discarding edits
    pub leave_confirmation_message: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            leave_action: LeaveAction::Reload,
            unsaved_changes_message: "You have unsaved changes. Do you want to save them?"
                .to_string(),
            leave_confirmation_message:
                "You have unsaved changes. Are you sure you want to leave?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeMapConfig {
    pub reveal_delay_ms: u32,
}

impl Default for TreeMapConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 3000,
        }
    }
}

/// Labels written into the shared `toggleButton`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub create_page: String,
    pub back_icon: String,
    pub edit_icon: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            create_page: "Create New Page".to_string(),
            back_icon: "/static/images/back.png".to_string(),
            edit_icon: "/static/images/edit.png".to_string(),
        }
    }
}

impl LabelConfig {
    pub fn back_html(&self) -> String {
        icon_html(&self.back_icon)
    }

    pub fn edit_html(&self) -> String {
        icon_html(&self.edit_icon)
    }
}

fn icon_html(src: &str) -> String {
    format!(r#"<img src="{}">"#, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_toolbar_matches_editor_string() {
        let options = EditorSettings::default().init_options();
        assert_eq!(
            options.toolbar,
            "export | undo redo | blocks fontfamily fontsize | bold italic underline strikethrough | link image media table | addcomment showcomments | spellcheckdialog a11ycheck | align lineheight | checklist numlist bullist indent outdent | emoticons charmap | removeformat"
        );
        assert_eq!(
            options.plugins,
            "anchor autolink charmap codesample image link lists media searchreplace table visualblocks wordcount"
        );
        assert_eq!(options.height, 1000);
        assert_eq!(options.selector, "#myTextarea");
    }

    #[test]
    fn test_editor_id_strips_hash() {
        assert_eq!(EditorSettings::default().editor_id(), "myTextarea");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ChromeConfig::from_yaml_str(
            "layout:\n  drawer_breakpoint_px: 900\nnavigation:\n  leave_action: back\n",
        )
        .unwrap();

        assert_eq!(config.layout.drawer_breakpoint_px, 900);
        assert_eq!(config.layout.drawer_indent_px, 250);
        assert_eq!(config.navigation.leave_action, LeaveAction::Back);
        assert_eq!(config.tree_map.reveal_delay_ms, 3000);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ChromeConfig::from_json_str("{}").unwrap(), ChromeConfig::default());
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let result = ChromeConfig::from_json_str("{\"tree_map\": {\"reveal_delay_ms\": \"soon\"}}");
        assert!(matches!(result, Err(ChromeError::Config(_))));
    }

    #[test]
    fn test_icon_html() {
        assert_eq!(
            LabelConfig::default().back_html(),
            r#"<img src="/static/images/back.png">"#
        );
    }
}

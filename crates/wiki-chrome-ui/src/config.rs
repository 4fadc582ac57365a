//! Page-supplied configuration
//!
//! Templates may embed overrides as
//! `<script id="wiki-chrome-config" type="application/json">{...}</script>`.
//! Anything missing or malformed falls back to the defaults.

use web_sys::Document;
use wiki_chrome_core::ChromeConfig;

pub const CONFIG_ELEMENT_ID: &str = "wiki-chrome-config";

pub fn load_config(document: &Document) -> ChromeConfig {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    parse_config(text.as_deref())
}

fn parse_config(text: Option<&str>) -> ChromeConfig {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return ChromeConfig::default();
    };
    ChromeConfig::from_json_str(text).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring page config, using defaults");
        ChromeConfig::default()
    })
}

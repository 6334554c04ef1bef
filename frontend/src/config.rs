//! Embedded UI configuration.

use lms_shared::UiConfig;
use std::sync::OnceLock;

const UI_CONFIG_TOML: &str = include_str!("../lms_ui.toml");

static UI_CONFIG: OnceLock<UiConfig> = OnceLock::new();

/// Parsed `lms_ui.toml`, falling back to defaults if it does not parse.
pub fn ui_config() -> &'static UiConfig {
    UI_CONFIG.get_or_init(|| match UiConfig::from_toml_str(UI_CONFIG_TOML) {
        Ok(config) => config,
        Err(error) => {
            zoon::eprintln!("⚠️ {error} - using defaults");
            UiConfig::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_is_valid() {
        let config = UiConfig::from_toml_str(UI_CONFIG_TOML).unwrap();
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.observer_options().root_margin(), "100px");
    }
}

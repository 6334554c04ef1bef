//! UI tuning loaded from `lms_ui.toml`.
//!
//! Every section and field has a default, so an empty document is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(details) => write!(f, "failed to parse UI config: {details}"),
            Self::Invalid(details) => write!(f, "invalid UI config: {details}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub cache: CacheSection,
    pub feed: FeedSection,
    pub observer: ObserverSection,
    pub search: SearchSection,
    pub logging: LoggingSection,
}

impl UiConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::Invalid("feed.page_size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.observer.visibility_threshold) {
            return Err(ConfigError::Invalid(format!(
                "observer.visibility_threshold must be within 0.0..=1.0, got {}",
                self.observer.visibility_threshold
            )));
        }
        if self.feed.scroll_threshold_px < 0.0 {
            return Err(ConfigError::Invalid("feed.scroll_threshold_px must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn observer_options(&self) -> crate::scroll::ObserverOptions {
        crate::scroll::ObserverOptions {
            root: crate::scroll::ObserverRoot::Viewport,
            root_margin_px: self.observer.root_margin_px,
            threshold: self.observer.visibility_threshold,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_ms: u64,
}

impl CacheSection {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_ms: crate::cache::DEFAULT_TTL.as_millis() as u64,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedSection {
    pub initial_page: u32,
    pub page_size: u32,
    pub scroll_threshold_px: f64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            initial_page: 1,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
            scroll_threshold_px: crate::scroll::DEFAULT_SCROLL_THRESHOLD_PX,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ObserverSection {
    pub root_margin_px: u32,
    pub visibility_threshold: f64,
}

impl Default for ObserverSection {
    fn default() -> Self {
        Self {
            root_margin_px: crate::scroll::DEFAULT_ROOT_MARGIN_PX,
            visibility_threshold: crate::scroll::DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSection {
    pub debounce_ms: u32,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debounce_ms: crate::search::DEFAULT_DEBOUNCE.as_millis() as u32,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    /// One of `error`, `warn`, `info`, `debug`, `trace`, `off`
    pub level: String,
}

impl LoggingSection {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = UiConfig::from_toml_str("").unwrap();
        assert_eq!(config, UiConfig::default());
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.observer_options().root_margin(), "100px");
        assert_eq!(config.search.debounce_ms, 300);
    }

    #[test]
    fn test_partial_sections_override() {
        let config = UiConfig::from_toml_str(
            r#"
            [cache]
            ttl_ms = 1000

            [feed]
            page_size = 5

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.ttl_ms, 1000);
        assert_eq!(config.feed.page_size, 5);
        assert_eq!(config.feed.initial_page, 1);
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            UiConfig::from_toml_str("[feed]\npage_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            UiConfig::from_toml_str("[observer]\nvisibility_threshold = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(UiConfig::from_toml_str("[feed"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let section = LoggingSection {
            level: "chatty".to_string(),
        };
        assert_eq!(section.level_filter(), log::LevelFilter::Info);
    }
}

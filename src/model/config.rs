use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdConfig {
    /// Prefix for debt item IDs (`UX` → `UX-001`)
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "UX".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Number of calendar months in the creation trend, ending with the current month
    #[serde(default = "default_window_months")]
    pub window_months: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            window_months: default_window_months(),
        }
    }
}

fn default_window_months() -> u32 {
    6
}

/// Which view the TUI opens on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Table,
    Kanban,
    Analytics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub default_view: DefaultView,
    #[serde(default)]
    pub show_key_hints: bool,
    /// Hex overrides keyed by theme slot (`background`, `highlight`, …)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.ids.prefix, "UX");
        assert_eq!(config.analytics.window_months, 6);
        assert_eq!(config.ui.default_view, DefaultView::Table);
        assert!(!config.ui.show_key_hints);
    }

    #[test]
    fn partial_sections_fill_in() {
        let config: AppConfig = toml::from_str(
            r##"
[ui]
default_view = "kanban"

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.ui.default_view, DefaultView::Kanban);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
        assert_eq!(config.ids.prefix, "UX");
    }
}

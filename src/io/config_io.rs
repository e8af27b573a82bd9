use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;
use crate::ops::analytics::MAX_WINDOW_MONTHS;

/// Error type for config.toml access
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("invalid config key \"{0}\" (use section.key, e.g. analytics.window_months)")]
    InvalidKey(String),
    #[error("analytics.window_months must be between 1 and {max} (got {value})")]
    WindowOutOfRange { value: u32, max: u32 },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}

/// Range checks serde can't express
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let months = config.analytics.window_months;
    if !(1..=MAX_WINDOW_MONTHS).contains(&months) {
        return Err(ConfigError::WindowOutOfRange {
            value: months,
            max: MAX_WINDOW_MONTHS,
        });
    }
    Ok(())
}

/// Read config.toml as an editable document (empty if missing).
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(data_dir);
    fs::write(&path, doc.to_string()).map_err(|source| ConfigError::WriteError { path, source })
}

fn split_key(key: &str) -> Result<(&str, &str), ConfigError> {
    match key.split_once('.') {
        Some((section, field)) if !section.is_empty() && !field.is_empty() => {
            Ok((section, field))
        }
        _ => Err(ConfigError::InvalidKey(key.to_string())),
    }
}

/// Look up `section.key` in the document, rendered as a plain string.
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Result<Option<String>, ConfigError> {
    let (section, field) = split_key(key)?;
    let value = doc
        .get(section)
        .and_then(|item| item.get(field))
        .and_then(|item| item.as_value());
    Ok(value.map(|v| match v.as_str() {
        Some(s) => s.to_string(),
        None => v.to_string().trim().to_string(),
    }))
}

/// Set `section.key` to `raw`, typed as bool or integer when it parses as
/// one, else string. The result must still deserialize as [`AppConfig`].
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let (section, field) = split_key(key)?;
    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let value = if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else if let Ok(n) = raw.parse::<i64>() {
        toml_edit::value(n)
    } else {
        toml_edit::value(raw)
    };
    doc[section][field] = value;
    validate(&toml::from_str::<AppConfig>(&doc.to_string())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefaultView;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"# uxdebt settings

[analytics]
# months shown in the trend
window_months = 6
"#;

    #[test]
    fn missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_config(tmp.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn set_preserves_comments() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        set_value(&mut doc, "analytics.window_months", "12").unwrap();
        set_value(&mut doc, "ui.default_view", "kanban").unwrap();

        let text = doc.to_string();
        assert!(text.contains("# months shown in the trend"));
        let config: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.analytics.window_months, 12);
        assert_eq!(config.ui.default_view, DefaultView::Kanban);
        assert_eq!(
            get_value(&doc, "ui.default_view").unwrap().as_deref(),
            Some("kanban")
        );
        assert_eq!(
            get_value(&doc, "analytics.window_months").unwrap().as_deref(),
            Some("12")
        );
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        assert!(matches!(
            set_value(&mut doc, "analytics.window_months", "lots"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            set_value(&mut doc, "window_months", "3"),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn window_months_must_be_in_range() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        for bad in ["0", "121", "3000000000"] {
            assert!(
                set_value(&mut doc, "analytics.window_months", bad).is_err(),
                "accepted {}",
                bad
            );
        }
        set_value(&mut doc, "analytics.window_months", "120").unwrap();

        let tmp = TempDir::new().unwrap();
        fs::write(
            config_path(tmp.path()),
            "[analytics]\nwindow_months = 2000000000\n",
        )
        .unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WindowOutOfRange {
                value: 2_000_000_000,
                max: 120
            }
        ));
        assert_eq!(
            err.to_string(),
            "analytics.window_months must be between 1 and 120 (got 2000000000)"
        );
    }

    #[test]
    fn write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let mut doc = read_config_doc(tmp.path()).unwrap();
        set_value(&mut doc, "ids.prefix", "UXD").unwrap();
        write_config(tmp.path(), &doc).unwrap();
        assert_eq!(read_config(tmp.path()).unwrap().ids.prefix, "UXD");
    }
}

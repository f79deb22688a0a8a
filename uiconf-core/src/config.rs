use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config directory not found")]
    NoConfigDir,
    #[error("option '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },
    #[error("option '{key}' must be one of {allowed}, got '{found}'")]
    NotInEnum {
        key: String,
        found: String,
        allowed: String,
    },
    #[error("option '{key}' is out of range: {detail}")]
    OutOfRange { key: String, detail: String },
    #[error("option '{0}' is read-only")]
    ReadOnly(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unknown widget kind '{0}'")]
    UnknownWidget(String),
}

/// Configuration file: a list of widget instances and their options
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub widget: Vec<WidgetConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetConfig {
    /// Instance name, unique within the file
    pub name: String,
    /// Registered widget kind (`fileManager`, `scheduler`, `pivotGrid`)
    pub kind: String,
    #[serde(default)]
    pub options: serde_json::Value,
}

impl WidgetConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            options: serde_json::Value::Null,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            widget: vec![
                WidgetConfig::new("files", "fileManager"),
                WidgetConfig::new("calendar", "scheduler"),
                WidgetConfig::new("pivot", "pivotGrid"),
            ],
        }
    }
}

impl ConfigFile {
    /// Default lookup paths, most specific first
    pub fn search_paths() -> Result<Vec<PathBuf>, ConfigError> {
        Ok(vec![
            std::env::current_dir()?.join("uiconf.toml"),
            dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("uiconf/uiconf.toml"),
        ])
    }

    pub fn load() -> Result<Self, ConfigError> {
        // Priority: ./uiconf.toml -> ~/.config/uiconf/uiconf.toml -> default
        for path in Self::search_paths()? {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        log::debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load a TOML file, or JSON when the extension is `.json`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        log::debug!("loading config from {}", path.display());
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::Json)
    }

    pub fn get_widget(&self, name: &str) -> Option<&WidgetConfig> {
        self.widget.iter().find(|w| w.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toml_widget_options() {
        let config = ConfigFile::from_toml_str(
            r#"
            [[widget]]
            name = "files"
            kind = "fileManager"

            [widget.options]
            selectionMode = "single"
            upload = { maxFileSize = 1048576 }

            [[widget]]
            name = "calendar"
            kind = "scheduler"
            "#,
        )
        .unwrap();

        assert_eq!(config.widget.len(), 2);
        let files = config.get_widget("files").unwrap();
        assert_eq!(files.options["selectionMode"], json!("single"));
        assert_eq!(files.options["upload"]["maxFileSize"], json!(1048576));
        assert!(config.get_widget("calendar").unwrap().options.is_null());
    }

    #[test]
    fn test_json_config() {
        let config = ConfigFile::from_json_str(
            r#"{ "widget": [ { "name": "p", "kind": "pivotGrid", "options": { "showBorders": true } } ] }"#,
        )
        .unwrap();
        assert_eq!(config.widget[0].options["showBorders"], json!(true));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = ConfigFile::from_toml_str("[[widget]]\nname = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_default_has_one_of_each_kind() {
        let config = ConfigFile::default();
        let kinds: Vec<_> = config.widget.iter().map(|w| w.kind.as_str()).collect();
        assert_eq!(kinds, vec!["fileManager", "scheduler", "pivotGrid"]);
    }
}

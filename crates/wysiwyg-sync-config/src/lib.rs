use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "WYSIWYG_SYNC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Options recognised by the sync bridge.
///
/// Every field has a default, so an empty file (or no file at all) gives the
/// immediate, lenient behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay before a Source View edit is pushed to the editor. 0 = immediate.
    pub debounce_ms: u64,
    /// Hand malformed HTML to the editor for best-effort rendering instead of
    /// rejecting it.
    pub lenient_render: bool,
    /// Compare the two projections modulo whitespace, so an editor that
    /// reformats its input doesn't cause a rewrite of the Source View.
    pub normalize_whitespace: bool,
    /// Shown in the Source View while the editor is empty (e.g. "HTML Preview").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_source_text: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            lenient_render: true,
            normalize_whitespace: false,
            empty_source_text: None,
        }
    }
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config file, falling back to defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$WYSIWYG_SYNC_CONFIG` if set, else `~/.config/wysiwyg-sync/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(overridden) = std::env::var(CONFIG_PATH_ENV)
            && let Some(expanded) = Self::expand_path(Path::new(&overridden))
        {
            return expanded;
        }
        let config_dir = shellexpand::tilde("~/.config/wysiwyg-sync");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();

        assert_eq!(config.debounce_ms, 0);
        assert!(config.lenient_render);
        assert!(!config.normalize_whitespace);
        assert_eq!(config.empty_source_text, None);
        assert_eq!(config.debounce(), Duration::ZERO);
    }

    #[test]
    fn test_config_path() {
        // Only test touching CONFIG_PATH_ENV, so the env changes stay in one thread.
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }
        let default_path = SyncConfig::config_path();
        assert!(!default_path.to_string_lossy().starts_with('~'));
        assert!(
            default_path
                .to_string_lossy()
                .ends_with(".config/wysiwyg-sync/config.toml")
        );

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("override/config.toml");
        unsafe {
            env::set_var(CONFIG_PATH_ENV, &config_file);
        }

        assert_eq!(SyncConfig::config_path(), config_file);
        assert_eq!(SyncConfig::load().unwrap(), None);
        assert_eq!(SyncConfig::load_or_default().unwrap(), SyncConfig::default());

        let saved = SyncConfig {
            debounce_ms: 200,
            normalize_whitespace: true,
            ..SyncConfig::default()
        };
        saved.save().unwrap();

        assert!(config_file.exists());
        assert_eq!(SyncConfig::load().unwrap(), Some(saved.clone()));
        assert_eq!(SyncConfig::load_or_default().unwrap(), saved);

        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config_content = r#"
debounce_ms = 250
"#;

        let config: SyncConfig = toml::from_str(config_content).unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert!(config.lenient_render);
    }

    #[test]
    fn test_full_toml() {
        let config_content = r#"
debounce_ms = 100
lenient_render = false
normalize_whitespace = true
empty_source_text = "HTML Preview"
"#;

        let config: SyncConfig = toml::from_str(config_content).unwrap();

        assert_eq!(
            config,
            SyncConfig {
                debounce_ms: 100,
                lenient_render: false,
                normalize_whitespace: true,
                empty_source_text: Some("HTML Preview".to_string()),
            }
        );
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = SyncConfig {
            debounce_ms: 300,
            lenient_render: false,
            ..SyncConfig::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: SyncConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/config.toml");
        let expanded = SyncConfig::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("test/config.toml"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/config.toml");
        let expanded = SyncConfig::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = SyncConfig::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "debounce_ms = \"soon\"").unwrap();

        let err = SyncConfig::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = SyncConfig {
            debounce_ms: 50,
            empty_source_text: Some("HTML Preview".to_string()),
            ..SyncConfig::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = SyncConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}

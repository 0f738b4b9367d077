use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::merge::MixMode;

/// Main mixkit configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub compose: ComposeConfig,
    pub merge: MergeConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Limits applied by the type registry
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Longest allowed inheritance chain, counting the type itself
    pub max_chain_depth: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Mode used by `mixkit merge` when none is given
    pub mode: MixMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory searched for manifests given by bare name
    pub manifests: PathBuf,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self { max_chain_depth: 64 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifests: Config::mixkit_dir().join("manifests"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check MIXKIT_CONFIG env var
        if let Ok(env_path) = std::env::var("MIXKIT_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from MIXKIT_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try MIXKIT_DIR/mixkit.yaml
        if let Ok(dir) = std::env::var("MIXKIT_DIR") {
            let path = PathBuf::from(dir).join("mixkit.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from MIXKIT_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/mixkit/mixkit.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("mixkit").join("mixkit.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./mixkit.yaml (for development)
        let local_config = PathBuf::from("mixkit.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// The mixkit directory (config file, manifests)
    pub fn mixkit_dir() -> PathBuf {
        std::env::var("MIXKIT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("mixkit"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Resolve a manifest argument: existing paths win, then the manifests dir
    pub fn manifest_path(&self, arg: &Path) -> PathBuf {
        let direct = Self::expand_path(arg);
        if direct.exists() {
            return direct;
        }
        let in_dir = Self::expand_path(&self.paths.manifests).join(arg);
        if in_dir.exists() {
            return in_dir;
        }
        let with_ext = in_dir.with_extension("yaml");
        if with_ext.exists() { with_ext } else { direct }
    }

    /// Look up a value by dotted key, as shown by `mixkit config get`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "log_level" | "log-level" => Some(self.log_level.as_filter().to_string()),
            "compose.max_chain_depth" => Some(self.compose.max_chain_depth.to_string()),
            "merge.mode" => Some(self.merge.mode.to_string()),
            "paths.manifests" => Some(self.paths.manifests.display().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.compose.max_chain_depth, 64);
        assert_eq!(config.merge.mode, MixMode::Deep);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("compose:\n  max_chain_depth: 8\n").unwrap();
        assert_eq!(config.compose.max_chain_depth, 8);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.merge.mode, MixMode::Deep);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mixkit.yaml");
        fs::write(&path, "log_level: debug\nmerge:\n  mode: shallow\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.merge.mode, MixMode::Shallow);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/definitely/not/here/mixkit.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/bin");
        assert_eq!(Config::expand_path(&path), PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/test"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().contains("test"));
    }

    #[test]
    fn test_manifest_path_falls_back_to_manifests_dir() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("widgets.yaml"), "types: {}\n").unwrap();
        let mut config = Config::default();
        config.paths.manifests = temp.path().to_path_buf();

        assert_eq!(
            config.manifest_path(Path::new("widgets")),
            temp.path().join("widgets.yaml")
        );
        assert_eq!(
            config.manifest_path(Path::new("widgets.yaml")),
            temp.path().join("widgets.yaml")
        );
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("merge.mode").as_deref(), Some("deep"));
        assert_eq!(config.get("log-level").as_deref(), Some("info"));
        assert_eq!(config.get("compose.max_chain_depth").as_deref(), Some("64"));
        assert!(config.get("nope").is_none());

        let shallow: Config = serde_yaml::from_str("merge:\n  mode: shallow\n").unwrap();
        assert_eq!(shallow.get("merge.mode").as_deref(), Some("shallow"));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Off.as_filter(), "off");
    }
}

//! Engine configuration and its loader.
//!
//! Settings live in `parley.toml`. Every field has a default, so a partial file is fine and
//! a missing or unreadable one just means the defaults are used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "parley.toml";

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "PARLEY_CONFIG";

/// Messages used by the `fallback` verb as the player keeps failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackMessages {
    /// First and second misunderstanding.
    pub confused: String,
    /// Third.
    pub lost: String,
    /// Every one after that.
    pub hint: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            confused: "You can't do that".to_string(),
            lost: "I don't understand that".to_string(),
            hint: "Try simple sentences with verbs like move, take, look, talk, and use.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World new sessions are created in.
    pub default_world: String,
    /// Reply when nothing could be made of an action.
    pub apology: String,
    /// Name of the speech markup tag every message is wrapped in.
    pub speech_tag: String,
    /// Directory for saved sessions; sessions are kept in memory when unset.
    pub session_dir: Option<PathBuf>,
    pub fallback: FallbackMessages,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_world: "cottage".to_string(),
            apology: "Sorry, I didn't catch that.".to_string(),
            speech_tag: "speak".to_string(),
            session_dir: None,
            fallback: FallbackMessages::default(),
        }
    }
}

/// Load the configuration from `path`, falling back to defaults if it can't be read or parsed.
pub fn load_config(path: &Path) -> EngineConfig {
    match try_load_config(path) {
        Ok(config) => {
            info!("engine configuration loaded from '{}'", path.display());
            config
        },
        Err(e) => {
            warn!("Could not load configuration from '{}': {e:#}. Using defaults.", path.display());
            EngineConfig::default()
        },
    }
}

fn try_load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading config from '{}'", path.display()))?;
    let config =
        toml::from_str(&text).with_context(|| format!("parsing config from '{}'", path.display()))?;
    Ok(config)
}

/// The config path: `$PARLEY_CONFIG` if set, else `parley.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Path::new("/definitely/not/here/parley.toml"));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.apology, "Sorry, I didn't catch that.");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apology = \"Eh?\"\n\n[fallback]\nlost = \"Lost again.\"").unwrap();

        let config = load_config(file.path());
        assert_eq!(config.apology, "Eh?");
        assert_eq!(config.fallback.lost, "Lost again.");
        assert_eq!(config.fallback.confused, "You can't do that");
        assert_eq!(config.speech_tag, "speak");
        assert!(config.session_dir.is_none());
    }

    #[test]
    fn broken_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apology = [").unwrap();
        assert_eq!(load_config(file.path()), EngineConfig::default());
    }
}

//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orview/orview.toml`
//! 3. Environment variables: `ORVIEW_*` prefix

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default API host for OpenReview v2.
pub const DEFAULT_BASE_URL: &str = "https://api2.openreview.net";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// OpenReview API base URL
    pub base_url: String,
    /// Username for the authenticated fallback (password is always prompted)
    pub username: Option<String>,
    /// Where the rendered conversation transcript is written
    pub transcript_file: PathBuf,
    /// Where the raw note structure dump is written
    pub structure_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            transcript_file: PathBuf::from("openreview_conversation_tree.txt"),
            structure_file: PathBuf::from("openreview_notes_structure.txt"),
        }
    }
}

impl Settings {
    /// Load settings with defaults < global config file < environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = global_config_path() {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        builder = builder.add_source(Environment::with_prefix("ORVIEW"));
        builder.build()?.try_deserialize()
    }
}

/// Path of the global config file, when a home directory can be resolved.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orview").map(|dirs| dirs.config_dir().join("orview.toml"))
}

/// Write a commented config template to `path`, creating parent directories.
/// Refuses to overwrite an existing file.
pub fn write_template(path: &Path) -> io::Result<()> {
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("config already exists: {}", path.display()),
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)
}

const CONFIG_TEMPLATE: &str = r#"# orview configuration
# All keys are optional; these are the defaults.

# base_url = "https://api2.openreview.net"

# Username for the authenticated fallback. The password is always prompted.
# username = "you@example.com"

# Output files (relative to the current directory).
# transcript_file = "openreview_conversation_tree.txt"
# structure_file = "openreview_notes_structure.txt"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_public_api() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.username.is_none());
    }

    #[test]
    fn template_round_trips_through_config_crate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orview.toml");
        write_template(&path).unwrap();

        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).unwrap())
            .add_source(File::from(path.clone()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn template_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orview.toml");
        write_template(&path).unwrap();
        assert!(write_template(&path).is_err());
    }
}

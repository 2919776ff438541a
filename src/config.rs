use crate::error::{PodsplitError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the Apple Podcasts group container relative to the home
/// directory.
const PODCASTS_CONTAINER: &str = "Library/Group Containers/243LU875E5.groups.com.apple.podcasts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the Apple Podcasts library database. Defaults to the
    /// standard container location when unset.
    pub library_db: Option<PathBuf>,

    /// Directory that imported shows are copied into.
    pub assets_dir: Option<PathBuf>,

    pub openai_api_key: Option<String>,

    /// Language hint passed to the transcription API (ISO 639-1).
    pub language: Option<String>,

    /// Segment target duration in minutes.
    pub target_minutes: u64,

    /// Number of concurrent transcription requests.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_db: None,
            assets_dir: None,
            openai_api_key: None,
            language: None,
            target_minutes: 20,
            concurrency: 4,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(path) = std::env::var("PODSPLIT_LIBRARY_DB") {
            config.library_db = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("PODSPLIT_ASSETS_DIR") {
            config.assets_dir = Some(PathBuf::from(path));
        }
        if let Ok(language) = std::env::var("PODSPLIT_LANGUAGE") {
            config.language = Some(language);
        }
        if let Ok(minutes) = std::env::var("PODSPLIT_TARGET_MINUTES") {
            if let Ok(m) = minutes.parse() {
                config.target_minutes = m;
            }
        }
        if let Ok(concurrency) = std::env::var("PODSPLIT_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                config.concurrency = c;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_minutes == 0 {
            return Err(PodsplitError::Config(
                "Target duration must be greater than 0 minutes".to_string(),
            ));
        }

        if self.concurrency == 0 {
            return Err(PodsplitError::Config(
                "Concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The transcribe path additionally needs an API key.
    pub fn validate_for_transcription(&self) -> Result<()> {
        self.validate()?;

        if self.openai_api_key.is_none() {
            return Err(PodsplitError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolved library database path, falling back to the Apple Podcasts
    /// container under the home directory.
    pub fn library_db_path(&self) -> Option<PathBuf> {
        self.library_db.clone().or_else(|| {
            dirs::home_dir().map(|home| {
                home.join(PODCASTS_CONTAINER)
                    .join("Documents/MTLibrary.sqlite")
            })
        })
    }

    /// Resolved assets directory, defaulting to `assets/` under the current
    /// working directory.
    pub fn assets_dir_path(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("assets"))
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("podsplit").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.target_minutes, 20);
        assert_eq!(config.concurrency, 4);
        assert!(config.library_db.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_target() {
        let config = Config {
            target_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transcription_requires_api_key() {
        let mut config = Config::default();
        assert!(config.validate_for_transcription().is_err());

        config.openai_api_key = Some("sk-test".to_string());
        assert!(config.validate_for_transcription().is_ok());
    }

    #[test]
    fn test_library_db_path_override() {
        let config = Config {
            library_db: Some(PathBuf::from("/tmp/MTLibrary.sqlite")),
            ..Default::default()
        };
        assert_eq!(
            config.library_db_path(),
            Some(PathBuf::from("/tmp/MTLibrary.sqlite"))
        );
    }

    #[test]
    fn test_assets_dir_default() {
        let config = Config::default();
        assert_eq!(config.assets_dir_path(), PathBuf::from("assets"));
    }
}

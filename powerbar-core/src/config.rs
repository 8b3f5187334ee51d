use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config directory not found")]
    NoConfigDir,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Fixed display width in cells. The terminal width is used when unset.
    pub width: Option<u16>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// Settings file location; defaults to `<config_dir>/powerbar/settings.toml`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 0=warn, 1=info, 2=debug, 3+=trace
    #[serde(default)]
    pub verbosity: u8,
    pub file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load() -> Result<Self, ConfigError> {
        // Priority: ./powerbar.toml -> ~/.config/powerbar/powerbar.toml -> default
        let paths = [
            std::env::current_dir()?.join("powerbar.toml"),
            dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("powerbar/powerbar.toml"),
        ];

        for path in paths {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_full_config() {
        let config = ConfigFile::parse(
            r#"
            [display]
            width = 90

            [settings]
            path = "/tmp/powerbar/settings.toml"

            [logging]
            verbosity = 2
            file = "/tmp/powerbar.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.width, Some(90));
        assert_eq!(
            config.settings.path.as_deref(),
            Some(Path::new("/tmp/powerbar/settings.toml"))
        );
        assert_eq!(config.logging.verbosity, 2);
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/powerbar.log")));
    }

    #[test]
    fn test_partial_section() {
        let config = ConfigFile::parse("[logging]\nverbosity = 1\n").unwrap();
        assert_eq!(config.logging.verbosity, 1);
        assert_eq!(config.logging.file, None);
        assert_eq!(config.display.width, None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ConfigFile::parse("[display]\nwidth = \"wide\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join(format!("powerbar-missing-{}.toml", rand::random::<u32>()));
        assert!(matches!(ConfigFile::load_from(&path), Err(ConfigError::Io(_))));
    }
}

//! Error types shared across powerbar-core.

/// Failure to load a toggle or to run one of its reactions.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("unknown toggle: {0}")]
    UnknownToggle(String),
    #[error("failed to construct toggle {id}: {reason}")]
    Construction { id: String, reason: String },
    #[error("toggle {id} failed to react: {reason}")]
    Reaction { id: String, reason: String },
}

impl ToggleError {
    pub fn construction(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn reaction(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Reaction {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to read, write or watch the persisted settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),
    #[error("Config directory not found")]
    NoConfigDir,
}

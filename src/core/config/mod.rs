use std::{env, fmt, path::PathBuf};

use tracing::warn;

mod loader;
mod paths;

pub use loader::ConfigLoader;
pub use paths::{ConfigPaths, RC_ENV};

use crate::input::TokenLimits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_line_length: usize,
    pub limits: TokenLimits,
    pub color: bool,
    pub history: bool,
    pub history_size: usize,
    pub log_filter: Option<String>,
    pub history_path: Option<PathBuf>,
    /// Rc entries that were skipped, reported once logging is set up.
    pub ignored: Vec<IgnoredKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredKey {
    pub line: usize,
    pub key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_line_length: 4096,
            limits: TokenLimits::default(),
            color: true,
            history: true,
            history_size: 1000,
            log_filter: None,
            history_path: None,
            ignored: Vec::new(),
        }
    }
}

impl Config {
    /// Rc file first, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let paths = ConfigPaths::discover();
        let mut config = ConfigLoader::new(&paths).load()?;
        config.history_path = paths.history_path;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, for when the rc file is unusable.
    pub fn fallback() -> Self {
        let mut config = Config {
            history_path: ConfigPaths::discover().history_path,
            ..Config::default()
        };
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }
    }

    pub fn report_ignored(&self) {
        for entry in &self.ignored {
            warn!(key = %entry.key, line = entry.line, "ignoring unknown config key");
        }
    }

    /// Where history is persisted, if anywhere.
    pub fn history_file(&self) -> Option<&PathBuf> {
        self.history_path.as_ref().filter(|_| self.history)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidLine {
        line: usize,
        content: String,
    },
    InvalidValue {
        key: String,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            ConfigError::InvalidLine { line, content } => {
                write!(f, "line {}: expected 'key = value', got '{}'", line, content)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

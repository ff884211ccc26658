use std::{fs, path::Path};

use tracing::debug;

use super::{Config, ConfigError, ConfigPaths, IgnoredKey};

/// Reads `key = value` settings from the rc file.
pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        if let Some(rc_path) = &self.paths.rc_path {
            self.source_if_exists(rc_path, &mut config)?;
        }
        Ok(config)
    }

    fn source_if_exists(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading rc file");
        Self::apply(&content, config)
    }

    pub fn apply(content: &str, config: &mut Config) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            Self::process_line(index + 1, line, config)?;
        }
        Ok(())
    }

    fn process_line(number: usize, line: &str, config: &mut Config) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::InvalidLine {
                line: number,
                content: line.to_string(),
            });
        };
        let key = key.trim();
        let value = unquote(value.trim());

        match key {
            "max_line_length" => config.max_line_length = parse_limit(key, value)?,
            "max_tokens" => config.limits.max_tokens = parse_limit(key, value)?,
            "max_token_length" => config.limits.max_token_length = parse_limit(key, value)?,
            "history_size" => config.history_size = parse_limit(key, value)?,
            "color" => config.color = parse_switch(key, value)?,
            "history" => config.history = parse_switch(key, value)?,
            "log" => config.log_filter = Some(value.to_string()),
            _ => config.ignored.push(IgnoredKey {
                line: number,
                key: key.to_string(),
            }),
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_switch(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

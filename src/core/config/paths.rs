use std::env;
use std::path::PathBuf;

pub const RC_ENV: &str = "MINISH_RC";

#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub rc_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
}

impl ConfigPaths {
    /// `$MINISH_RC` wins over `~/.minishrc`. Without a home directory there
    /// is no rc file and no persistent history.
    pub fn discover() -> Self {
        let home = dirs::home_dir();
        let rc_path = env::var_os(RC_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|home| home.join(".minishrc")));

        ConfigPaths {
            rc_path,
            history_path: home.map(|home| home.join(".minish_history")),
        }
    }
}

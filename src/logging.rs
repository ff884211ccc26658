use std::io::{self, IsTerminal};

use tracing_subscriber::{filter::ParseError, fmt, prelude::*, reload, EnvFilter, Registry};

pub const LOG_ENV: &str = "MINISH_LOG";

/// Swaps in the rc file's filter once the config has been read.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Sends diagnostics to stderr, filtered by `MINISH_LOG`. Without it nothing
/// is logged until [`LogHandle::apply_config`] installs the rc file's filter.
/// Returns `None` when a global subscriber is already in place.
pub fn init() -> Option<LogHandle> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).ok();
    let from_env = env_filter.is_some();
    let (filter, handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("off")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(io::stderr().is_terminal()),
        )
        .try_init()
        .ok()?;

    Some(LogHandle {
        filter: handle,
        from_env,
    })
}

impl LogHandle {
    /// Applies the rc `log` directives, unless `MINISH_LOG` already chose.
    pub fn apply_config(&self, directives: Option<&str>) -> Result<(), ParseError> {
        let Some(directives) = directives.filter(|_| !self.from_env) else {
            return Ok(());
        };
        let filter = EnvFilter::try_new(directives)?;
        if let Err(err) = self.filter.reload(filter) {
            eprintln!("minish: could not apply log filter: {}", err);
        }
        Ok(())
    }
}

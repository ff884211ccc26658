use minish::core::config::Config;
use minish::error::ShellError;
use minish::shell::Shell;
use std::env;
use std::process::ExitCode;
use tracing::warn;

fn main() -> ExitCode {
    if env::args_os().len() > 1 {
        eprintln!("minish: {}", ShellError::Usage);
        return ExitCode::FAILURE;
    }

    let log = minish::logging::init();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::fallback(), Some(ShellError::Config(err))),
    };
    if let Some(log) = &log {
        if let Err(err) = log.apply_config(config.log_filter.as_deref()) {
            eprintln!("minish: ignoring log filter: {}", err);
        }
    }
    config.report_ignored();

    if let Some(err) = config_error {
        warn!(%err, "using default configuration");
        eprintln!("minish: {}; using defaults", err);
    }

    match Shell::new(config).and_then(|mut shell| shell.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("minish: {}", err);
            ExitCode::FAILURE
        }
    }
}

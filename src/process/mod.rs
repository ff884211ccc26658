use std::fmt;
use std::io;

pub mod executor;
pub mod signal;

pub use executor::{ChildReport, ChildStatus, ProcessExecutor};
pub use signal::SignalBridge;

#[derive(Debug)]
pub enum ProcessError {
    EmptyCommand,
    CommandNotFound(String),
    Spawn { program: String, source: io::Error },
    Wait(io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::EmptyCommand => write!(f, "no command given"),
            ProcessError::CommandNotFound(cmd) => write!(f, "command not found: {}", cmd),
            ProcessError::Spawn { program, source } => {
                write!(f, "could not run '{}': {}", program, source)
            }
            ProcessError::Wait(e) => write!(f, "wait() failed: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Spawn { source, .. } => Some(source),
            ProcessError::Wait(e) => Some(e),
            _ => None,
        }
    }
}

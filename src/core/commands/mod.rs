use std::collections::BTreeMap;

use tracing::debug;

mod cd;
mod exit;

pub use cd::{CdCommand, CdError};
pub use exit::ExitCommand;

use crate::input::TokenTable;
use crate::process::{ProcessError, ProcessExecutor, SignalBridge};

/// What the interpreter loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The command ended because of Ctrl-C; the next prompt starts on a fresh line.
    Interrupted,
    Exit,
}

#[derive(Debug)]
pub enum CommandError {
    Cd(CdError),
    Process(ProcessError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Cd(err) => write!(f, "{}", err),
            CommandError::Process(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Cd(err) => Some(err),
            CommandError::Process(err) => Some(err),
        }
    }
}

impl From<CdError> for CommandError {
    fn from(err: CdError) -> Self {
        CommandError::Cd(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::Process(err)
    }
}

/// A command that runs inside the interpreter process.
pub trait Command {
    fn execute(&self, args: &[String]) -> Result<Flow, CommandError>;
}

#[derive(Debug, Clone)]
enum CommandType {
    Cd(CdCommand),
    Exit(ExitCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String]) -> Result<Flow, CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args),
            CommandType::Exit(cmd) => cmd.execute(args),
        }
    }
}

/// Routes a token table to a built-in or to an external program.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    commands: BTreeMap<&'static str, CommandType>,
    process_executor: ProcessExecutor,
}

impl CommandExecutor {
    pub fn new(signals: SignalBridge) -> Self {
        Self::with_cd(signals, CdCommand::new())
    }

    pub fn with_cd(signals: SignalBridge, cd: CdCommand) -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd", CommandType::Cd(cd));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));

        Self {
            commands,
            process_executor: ProcessExecutor::new(signals),
        }
    }

    pub fn dispatch(&self, tokens: &TokenTable) -> Result<Flow, CommandError> {
        let Some(name) = tokens.first() else {
            return Ok(Flow::Continue);
        };

        if let Some(cmd) = self.commands.get(name) {
            debug!(builtin = name, "dispatching built-in");
            return cmd.execute(tokens.args());
        }

        debug!(program = name, args = tokens.args().len(), "dispatching external command");
        let report = self.process_executor.spawn_process(tokens.as_slice())?;
        if report.interrupted {
            debug!(pid = report.pid, status = ?report.status, "foreground command interrupted");
            return Ok(Flow::Interrupted);
        }
        Ok(Flow::Continue)
    }

    #[cfg(test)]
    fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }
}

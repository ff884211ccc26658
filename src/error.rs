use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::input::TokenizeError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    Signal(std::io::Error),
    Usage,
    LineTooLong { limit: usize },
    Tokenize(TokenizeError),
    Command(CommandError),
    Config(ConfigError),
}

impl ShellError {
    /// Errors that leave the interpreter unable to keep reading commands.
    /// Everything else is reported and the loop moves on to the next prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Readline(_) | ShellError::Io(_) | ShellError::Signal(_) | ShellError::Usage
        )
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<TokenizeError> for ShellError {
    fn from(err: TokenizeError) -> Self {
        ShellError::Tokenize(err)
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::Command(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::Config(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "could not read from stdin: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::Signal(e) => write!(f, "could not install SIGINT handler: {}", e),
            ShellError::Usage => write!(f, "too many command-line arguments received"),
            ShellError::LineTooLong { limit } => {
                write!(f, "command line exceeds {} bytes", limit)
            }
            ShellError::Tokenize(e) => write!(f, "{}", e),
            ShellError::Command(e) => write!(f, "{}", e),
            ShellError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for ShellError {}

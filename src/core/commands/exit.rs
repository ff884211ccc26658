use super::{Command, CommandError, Flow};

#[derive(Debug, Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String]) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}

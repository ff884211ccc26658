use tracing::debug;

use super::{reader::LineReader, Shell};
use crate::core::commands::Flow;
use crate::error::ShellError;

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError>;
}

impl<R: LineReader> CommandHandler for Shell<R> {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError> {
        if line.len() > self.config.max_line_length {
            return Err(ShellError::LineTooLong {
                limit: self.config.max_line_length,
            });
        }

        let tokens = self.tokenizer.tokenize(line)?;
        if tokens.is_empty() {
            return Ok(());
        }

        match self.commands.dispatch(&tokens)? {
            Flow::Continue => {}
            Flow::Interrupted => {
                debug!("command cut short by interrupt");
                self.session.note_interrupt();
            }
            Flow::Exit => self.session.request_exit(),
        }
        Ok(())
    }
}

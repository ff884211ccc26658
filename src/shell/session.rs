use std::env;

use tracing::warn;

/// Where the loop stands with respect to the last Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptState {
    #[default]
    Clear,
    /// A read or a foreground child was cut short; the next prompt owes a newline.
    Pending,
    /// The newline has been printed.
    Consumed,
}

#[derive(Debug, Default)]
pub struct Session {
    interrupt: InterruptState,
    exit_requested: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn interrupt(&self) -> InterruptState {
        self.interrupt
    }

    pub fn note_interrupt(&mut self) {
        self.interrupt = InterruptState::Pending;
    }

    /// True exactly once per interrupt: whether the coming prompt should
    /// start on a fresh line.
    pub fn take_prompt_break(&mut self) -> bool {
        if self.interrupt == InterruptState::Pending {
            self.interrupt = InterruptState::Consumed;
            true
        } else {
            false
        }
    }

    pub fn line_read(&mut self) {
        self.interrupt = InterruptState::Clear;
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Working directory as shown in the prompt, read fresh every time.
    pub fn current_dir(&self) -> String {
        match env::current_dir() {
            Ok(dir) => dir.display().to_string(),
            Err(err) => {
                warn!(%err, "could not retrieve working directory");
                "?".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_lifecycle() {
        let mut session = Session::new();
        assert_eq!(session.interrupt(), InterruptState::Clear);
        assert!(!session.take_prompt_break());

        session.note_interrupt();
        assert_eq!(session.interrupt(), InterruptState::Pending);
        assert!(session.take_prompt_break());
        assert_eq!(session.interrupt(), InterruptState::Consumed);
        assert!(!session.take_prompt_break());

        session.line_read();
        assert_eq!(session.interrupt(), InterruptState::Clear);
    }

    #[test]
    fn test_exit_flag() {
        let mut session = Session::new();
        assert!(!session.exit_requested());
        session.request_exit();
        assert!(session.exit_requested());
    }
}

use std::io::{self, IsTerminal};

use tracing::{debug, info};

mod executor;
mod reader;
mod session;

pub use reader::{LineReader, Prompt, ReadOutcome, StdinReader};
pub use session::Session;

use crate::{
    core::{commands::CommandExecutor, config::Config},
    error::ShellError,
    highlight::PromptPainter,
    input::{render_prompt, Tokenizer},
    process::SignalBridge,
};

use executor::CommandHandler;

pub struct Shell<R: LineReader = StdinReader> {
    pub(crate) reader: R,
    pub(crate) config: Config,
    pub(crate) signals: SignalBridge,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) commands: CommandExecutor,
    pub(crate) session: Session,
    pub(crate) error_painter: PromptPainter,
}

impl Shell<StdinReader> {
    pub fn new(config: Config) -> Result<Self, ShellError> {
        let signals = SignalBridge::install().map_err(ShellError::Signal)?;
        let reader = StdinReader::new(&config, signals.clone())?;
        Ok(Self::with_reader(config, signals, reader))
    }
}

impl<R: LineReader> Shell<R> {
    pub fn with_reader(config: Config, signals: SignalBridge, reader: R) -> Self {
        let error_painter = if io::stderr().is_terminal() {
            PromptPainter::new(config.color)
        } else {
            PromptPainter::plain()
        };

        Shell {
            reader,
            tokenizer: Tokenizer::new(config.limits),
            commands: CommandExecutor::new(signals.clone()),
            signals,
            session: Session::new(),
            error_painter,
            config,
        }
    }

    /// Runs until `exit` or end of input. Only errors that make further
    /// reading impossible are returned; per-command errors are reported on
    /// stderr and the loop goes on.
    pub fn run(&mut self) -> Result<(), ShellError> {
        info!("session started");
        let result = self.run_loop();
        self.reader.finish();
        info!("session ended");
        result
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn run_loop(&mut self) -> Result<(), ShellError> {
        while !self.session.exit_requested() {
            let prompt = Prompt {
                fresh_line: self.session.take_prompt_break(),
                text: render_prompt(&self.session.current_dir()),
            };

            match self.reader.read_line(&prompt)? {
                ReadOutcome::Line(line) => {
                    self.session.line_read();

                    if let Err(err) = self.execute_line(&line) {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        self.report(&err);
                    }
                }
                ReadOutcome::Interrupted => {
                    self.signals.check_and_clear();
                    self.session.note_interrupt();
                }
                ReadOutcome::Eof => {
                    debug!("end of input");
                    break;
                }
            }
        }
        Ok(())
    }

    fn report(&self, err: &ShellError) {
        eprintln!("{}", self.error_painter.paint_error(&format!("minish: {}", err)));
    }
}

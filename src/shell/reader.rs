use std::io::{self, IsTerminal, Read, Write};
use std::mem;
use std::path::PathBuf;

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::error::ShellError;
use crate::highlight::PromptPainter;
use crate::input::PromptHelper;
use crate::process::SignalBridge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// Print a newline first, because the previous line was abandoned mid-way.
    pub fresh_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

/// Source of command lines for the interpreter loop.
pub trait LineReader {
    /// Shows `prompt` and blocks for one line. `Err` means input is unusable
    /// and the session cannot continue.
    fn read_line(&mut self, prompt: &Prompt) -> Result<ReadOutcome, ShellError>;

    /// Called once when the session ends.
    fn finish(&mut self) {}
}

/// Reads command lines from stdin: through rustyline on a terminal, straight
/// off the descriptor otherwise.
pub struct StdinReader {
    source: Source,
}

enum Source {
    Editor {
        editor: Box<Editor<PromptHelper, FileHistory>>,
        history_file: Option<PathBuf>,
    },
    Pipe {
        input: PipedInput,
        painter: PromptPainter,
    },
}

impl StdinReader {
    pub fn new(config: &Config, signals: SignalBridge) -> Result<Self, ShellError> {
        if !io::stdin().is_terminal() {
            let painter = if io::stdout().is_terminal() {
                PromptPainter::new(config.color)
            } else {
                PromptPainter::plain()
            };
            debug!("stdin is not a terminal; line editing off");
            return Ok(StdinReader {
                source: Source::Pipe {
                    input: PipedInput::new(signals),
                    painter,
                },
            });
        }

        let mut editor = Editor::<PromptHelper, FileHistory>::new()?;
        editor.set_helper(Some(PromptHelper::new(PromptPainter::new(config.color))));
        editor.set_max_history_size(config.history_size)?;

        let history_file = config.history_file().cloned();
        if let Some(path) = &history_file {
            if path.exists() {
                if let Err(err) = editor.load_history(path) {
                    warn!(path = %path.display(), %err, "could not load history");
                }
            }
        }

        Ok(StdinReader {
            source: Source::Editor {
                editor: Box::new(editor),
                history_file,
            },
        })
    }
}

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &Prompt) -> Result<ReadOutcome, ShellError> {
        if prompt.fresh_line {
            println!();
        }

        match &mut self.source {
            Source::Editor { editor, .. } => match editor.readline(&prompt.text) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(err) = editor.add_history_entry(line.as_str()) {
                            warn!(%err, "could not add to history");
                        }
                    }
                    Ok(ReadOutcome::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                Err(err) => Err(err.into()),
            },
            Source::Pipe { input, painter } => {
                let mut stdout = io::stdout().lock();
                write!(stdout, "{}", painter.paint_prompt(&prompt.text))?;
                stdout.flush()?;
                drop(stdout);

                Ok(input.next_line(&mut io::stdin().lock())?)
            }
        }
    }

    fn finish(&mut self) {
        if let Source::Editor {
            editor,
            history_file: Some(path),
        } = &mut self.source
        {
            match editor.save_history(path) {
                Ok(()) => debug!(path = %path.display(), "saved history"),
                Err(err) => warn!(path = %path.display(), %err, "could not save history"),
            }
        }
    }
}

/// Splits raw stdin into lines. A Ctrl-C that lands while the read is
/// blocked drops the partial line and reports [`ReadOutcome::Interrupted`];
/// `BufRead::read_line` would retry instead.
struct PipedInput {
    signals: SignalBridge,
    pending: Vec<u8>,
    eof: bool,
}

impl PipedInput {
    fn new(signals: SignalBridge) -> Self {
        PipedInput {
            signals,
            pending: Vec::new(),
            eof: false,
        }
    }

    fn next_line<I: Read>(&mut self, input: &mut I) -> io::Result<ReadOutcome> {
        let mut chunk = [0u8; 1024];
        loop {
            if let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending.drain(..=end).collect();
                return Ok(ReadOutcome::Line(decode_line(&line)));
            }
            if self.eof {
                if self.pending.is_empty() {
                    return Ok(ReadOutcome::Eof);
                }
                let line = mem::take(&mut self.pending);
                return Ok(ReadOutcome::Line(decode_line(&line)));
            }
            if self.signals.check_and_clear() {
                debug!(dropped = self.pending.len(), "read interrupted");
                self.pending.clear();
                return Ok(ReadOutcome::Interrupted);
            }

            match input.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                // the flag decides what the signal meant
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

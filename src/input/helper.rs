use std::borrow::Cow;

use crate::highlight::PromptPainter;

use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

/// Formats the prompt shown before each read.
pub fn render_prompt(cwd: &str) -> String {
    format!("[{}]$ ", cwd)
}

/// Line editor helper: colors the prompt's directory and completes file names.
pub struct PromptHelper {
    painter: PromptPainter,
    filenames: FilenameCompleter,
}

impl PromptHelper {
    pub fn new(painter: PromptPainter) -> Self {
        PromptHelper {
            painter,
            filenames: FilenameCompleter::new(),
        }
    }
}

impl Helper for PromptHelper {}

impl Highlighter for PromptHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        self.painter.paint_prompt(prompt)
    }
}

impl Hinter for PromptHelper {
    type Hint = String;
}

impl Validator for PromptHelper {}

impl Completer for PromptHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.filenames.complete(line, pos, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        assert_eq!(render_prompt("/home/u"), "[/home/u]$ ");
    }

    #[test]
    fn test_plain_prompt_is_borrowed() {
        let helper = PromptHelper::new(PromptPainter::plain());
        let prompt = render_prompt("/tmp");
        assert!(matches!(
            helper.highlight_prompt(&prompt, true),
            Cow::Borrowed("[/tmp]$ ")
        ));
    }

    #[test]
    fn test_foreign_prompt_untouched() {
        let helper = PromptHelper::new(PromptPainter::new(true));
        assert_eq!(helper.highlight_prompt("> ", true), "> ");
    }
}

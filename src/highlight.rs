use std::borrow::Cow;

use inksac::prelude::*;

use crate::input::render_prompt;

/// Colors for the prompt and for error reports.
#[derive(Debug, Clone, Copy)]
pub struct PromptPainter {
    color_support: ColorSupport,
}

impl PromptPainter {
    pub fn new(enabled: bool) -> Self {
        let support = if enabled {
            check_color_support().unwrap_or(ColorSupport::NoColor)
        } else {
            ColorSupport::NoColor
        };
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    pub fn paint_cwd(&self, cwd: &str) -> String {
        if !self.is_enabled() {
            return cwd.to_string();
        }

        let cwd_style = Style::builder().foreground(Color::Blue).bold().build();
        cwd.style(cwd_style).to_string()
    }

    /// Colors the directory of a `[cwd]$ ` prompt. Anything else, or any
    /// prompt while colors are off, comes back untouched.
    pub fn paint_prompt<'p>(&self, prompt: &'p str) -> Cow<'p, str> {
        let cwd = prompt
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix("]$ "));
        match cwd {
            Some(cwd) if self.is_enabled() => Cow::Owned(render_prompt(&self.paint_cwd(cwd))),
            _ => Cow::Borrowed(prompt),
        }
    }

    pub fn paint_error(&self, error: &str) -> String {
        if !self.is_enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_painter_passes_through() {
        let painter = PromptPainter::plain();
        assert!(!painter.is_enabled());
        assert_eq!(painter.paint_cwd("/tmp"), "/tmp");
        assert_eq!(painter.paint_error("boom"), "boom");
    }

    #[test]
    fn test_disabled_painter_ignores_terminal() {
        let painter = PromptPainter::new(false);
        assert_eq!(painter.paint_cwd("/home/u"), "/home/u");
    }

    #[test]
    fn test_prompt_directory_is_colored() {
        let painter = PromptPainter {
            color_support: ColorSupport::Basic,
        };
        let painted = painter.paint_prompt("[/srv/data]$ ");

        assert!(matches!(painted, Cow::Owned(_)));
        assert!(painted.starts_with('['));
        assert!(painted.ends_with("]$ "));
        assert!(painted.contains("/srv/data"));
        assert_ne!(painted, "[/srv/data]$ ");
        assert_eq!(painter.paint_prompt("> "), "> ");
    }

    #[test]
    fn test_plain_prompt_is_borrowed() {
        let painted = PromptPainter::plain().paint_prompt("[/tmp]$ ");
        assert!(matches!(painted, Cow::Borrowed("[/tmp]$ ")));
    }

    #[test]
    fn test_painted_cwd_keeps_text() {
        let painter = PromptPainter::new(true);
        assert!(painter.paint_cwd("/srv/data").contains("/srv/data"));
    }
}

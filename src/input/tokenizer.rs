use std::fmt;
use std::mem;

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    UnterminatedQuote,
    TooManyTokens { limit: usize },
    TokenTooLong { limit: usize },
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::UnterminatedQuote => {
                write!(f, "malformed command: unterminated double quote")
            }
            TokenizeError::TooManyTokens { limit } => {
                write!(f, "malformed command: more than {} tokens", limit)
            }
            TokenizeError::TokenTooLong { limit } => {
                write!(f, "malformed command: token longer than {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    pub max_tokens: usize,
    pub max_token_length: usize,
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            max_token_length: 4096,
        }
    }
}

/// Tokens of one command line, in input order.
///
/// Never holds an empty token, so the end of the table is the end of the
/// command: consumers iterate the slice and never look past it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: Vec<String>,
}

impl TokenTable {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Command name.
    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    limits: TokenLimits,
}

impl Tokenizer {
    pub fn new(limits: TokenLimits) -> Self {
        Self { limits }
    }

    /// Splits `line` on runs of spaces, keeping double-quoted regions intact.
    ///
    /// Input stops at the first newline. Inside a quoted region a doubled
    /// quote (`""`) is swallowed and the region stays open, so `"a""b"` is the
    /// single token `ab`. A quote still open at end of line is an error.
    pub fn tokenize(&self, line: &str) -> Result<TokenTable, TokenizeError> {
        let line = line.split_once('\n').map_or(line, |(head, _)| head);

        let mut table = TokenTable::default();
        let mut current = String::new();
        let mut quote = QuoteState::Closed;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match (quote, c) {
                (QuoteState::Closed, '"') => quote = QuoteState::Open,
                (QuoteState::Open, '"') => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                    } else {
                        quote = QuoteState::Closed;
                    }
                }
                (QuoteState::Closed, ' ') => self.finish_token(&mut table, &mut current)?,
                (_, c) => self.push_char(&mut current, c)?,
            }
        }

        if quote == QuoteState::Open {
            return Err(TokenizeError::UnterminatedQuote);
        }
        self.finish_token(&mut table, &mut current)?;

        trace!(tokens = table.len(), "tokenized line");
        Ok(table)
    }

    fn push_char(&self, current: &mut String, c: char) -> Result<(), TokenizeError> {
        if current.len() + c.len_utf8() > self.limits.max_token_length {
            return Err(TokenizeError::TokenTooLong {
                limit: self.limits.max_token_length,
            });
        }
        current.push(c);
        Ok(())
    }

    fn finish_token(
        &self,
        table: &mut TokenTable,
        current: &mut String,
    ) -> Result<(), TokenizeError> {
        if current.is_empty() {
            return Ok(());
        }
        if table.tokens.len() >= self.limits.max_tokens {
            return Err(TokenizeError::TooManyTokens {
                limit: self.limits.max_tokens,
            });
        }
        table.tokens.push(mem::take(current));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        Tokenizer::default()
            .tokenize(line)
            .unwrap()
            .as_slice()
            .to_vec()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(tokens("ls -la\n"), vec!["ls", "-la"]);
    }

    #[test]
    fn test_runs_of_spaces() {
        assert_eq!(tokens("  ls    -la   /tmp  "), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_quoted_spaces_preserved() {
        assert_eq!(tokens("echo \"a b\" c\n"), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn test_doubled_quote_inside_region() {
        assert_eq!(tokens("echo \"a\"\"b\"\n"), vec!["echo", "ab"]);
    }

    #[test]
    fn test_quote_joins_adjacent_text() {
        assert_eq!(tokens("say\"hello world\"!"), vec!["sayhello world!"]);
    }

    #[test]
    fn test_empty_quotes_produce_no_token() {
        assert_eq!(tokens("echo \"\" x"), vec!["echo", "x"]);
    }

    #[test]
    fn test_unterminated_quote() {
        let result = Tokenizer::default().tokenize("echo \"abc\n");
        assert_eq!(result, Err(TokenizeError::UnterminatedQuote));
    }

    #[test]
    fn test_stops_at_newline() {
        assert_eq!(tokens("pwd\nrm -rf /"), vec!["pwd"]);
    }

    #[test]
    fn test_blank_line() {
        let table = Tokenizer::default().tokenize("   \n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.first(), None);
        assert!(table.args().is_empty());
    }

    #[test]
    fn test_tabs_are_not_separators() {
        assert_eq!(tokens("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_token_count_limit() {
        let tokenizer = Tokenizer::new(TokenLimits {
            max_tokens: 2,
            max_token_length: 16,
        });
        assert!(tokenizer.tokenize("a b").is_ok());
        assert_eq!(
            tokenizer.tokenize("a b c"),
            Err(TokenizeError::TooManyTokens { limit: 2 })
        );
    }

    #[test]
    fn test_token_length_limit() {
        let tokenizer = Tokenizer::new(TokenLimits {
            max_tokens: 8,
            max_token_length: 4,
        });
        assert!(tokenizer.tokenize("abcd").is_ok());
        assert_eq!(
            tokenizer.tokenize("echo abcde"),
            Err(TokenizeError::TokenTooLong { limit: 4 })
        );
        // multi-byte characters count by their encoded length
        assert!(tokenizer.tokenize("éé").is_ok());
        assert!(tokenizer.tokenize("ééé").is_err());
    }

    #[test]
    fn test_args_view() {
        let table = Tokenizer::default().tokenize("cd ~/sub extra").unwrap();
        assert_eq!(table.first(), Some("cd"));
        assert_eq!(table.args(), ["~/sub".to_string(), "extra".to_string()]);
        assert_eq!(table.as_slice(), ["cd", "~/sub", "extra"]);
    }
}

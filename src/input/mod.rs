mod helper;
mod tokenizer;

pub use helper::{render_prompt, PromptHelper};
pub use tokenizer::{TokenLimits, TokenTable, TokenizeError, Tokenizer};

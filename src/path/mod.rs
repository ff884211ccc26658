use std::fmt;

mod expander;

pub use expander::PathExpander;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    HomeNotSet,
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::HomeNotSet => write!(f, "HOME is not set"),
        }
    }
}

impl std::error::Error for ExpandError {}

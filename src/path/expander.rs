use super::ExpandError;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Resolves `cd` operands against a home directory.
///
/// `~` is a plain prefix substitution: `~/src` and `~src` both become the
/// home directory followed by the rest of the operand. There is no `~user`
/// lookup.
#[derive(Debug, Clone)]
pub struct PathExpander {
    home: Option<OsString>,
}

impl Default for PathExpander {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PathExpander {
    pub fn from_env() -> Self {
        Self {
            home: env::var_os("HOME"),
        }
    }

    pub fn with_home(home: Option<impl Into<OsString>>) -> Self {
        Self {
            home: home.map(Into::into),
        }
    }

    pub fn expand(&self, operand: Option<&str>) -> Result<PathBuf, ExpandError> {
        match operand {
            None | Some("~") => self.home_dir(),
            Some(path) => match path.strip_prefix('~') {
                Some(rest) => {
                    let mut joined = self.home_dir()?.into_os_string();
                    joined.push(rest);
                    Ok(PathBuf::from(joined))
                }
                None => Ok(PathBuf::from(path)),
            },
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf, ExpandError> {
        match &self.home {
            Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
            _ => Err(ExpandError::HomeNotSet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> PathExpander {
        PathExpander::with_home(Some("/home/u"))
    }

    #[test]
    fn test_no_operand_is_home() {
        assert_eq!(expander().expand(None).unwrap(), PathBuf::from("/home/u"));
    }

    #[test]
    fn test_bare_tilde_is_home() {
        assert_eq!(expander().expand(Some("~")).unwrap(), PathBuf::from("/home/u"));
    }

    #[test]
    fn test_tilde_prefix() {
        assert_eq!(
            expander().expand(Some("~/sub")).unwrap(),
            PathBuf::from("/home/u/sub")
        );
    }

    #[test]
    fn test_tilde_is_plain_concatenation() {
        assert_eq!(
            expander().expand(Some("~other")).unwrap(),
            PathBuf::from("/home/uother")
        );
    }

    #[test]
    fn test_literal_operand() {
        assert_eq!(
            expander().expand(Some("../x/~y")).unwrap(),
            PathBuf::from("../x/~y")
        );
    }

    #[test]
    fn test_missing_home() {
        let expander = PathExpander::with_home(None::<OsString>);
        assert!(matches!(expander.expand(None), Err(ExpandError::HomeNotSet)));
        assert!(matches!(
            expander.expand(Some("~/a")),
            Err(ExpandError::HomeNotSet)
        ));
        assert_eq!(expander.expand(Some("/tmp")).unwrap(), PathBuf::from("/tmp"));
    }

    #[test]
    fn test_empty_home_counts_as_missing() {
        let expander = PathExpander::with_home(Some(""));
        assert!(matches!(expander.home_dir(), Err(ExpandError::HomeNotSet)));
    }
}

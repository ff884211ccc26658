use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io};

use tracing::debug;

use super::{Command, CommandError, Flow};
use crate::path::{ExpandError, PathExpander};

#[derive(Debug)]
pub enum CdError {
    HomeNotSet,
    NotFound { path: PathBuf },
    Unresolvable { path: PathBuf, source: io::Error },
    NotADirectory { path: PathBuf },
    Inaccessible { path: PathBuf, source: io::Error },
}

impl fmt::Display for CdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdError::HomeNotSet => write!(f, "cd: HOME is not set"),
            CdError::NotFound { path } => {
                write!(f, "cd: '{}': no such file or directory", path.display())
            }
            CdError::Unresolvable { path, source } => write!(
                f,
                "cd: cannot get full path of '{}': {}",
                path.display(),
                source
            ),
            CdError::NotADirectory { path } => {
                write!(f, "cd: '{}' is not a directory", path.display())
            }
            CdError::Inaccessible { path, source } => write!(
                f,
                "cd: cannot change directory to '{}': {}",
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for CdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CdError::Unresolvable { source, .. } | CdError::Inaccessible { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

impl From<ExpandError> for CdError {
    fn from(err: ExpandError) -> Self {
        match err {
            ExpandError::HomeNotSet => CdError::HomeNotSet,
        }
    }
}

/// Changes the interpreter's own working directory.
#[derive(Debug, Clone, Default)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl CdCommand {
    pub fn new() -> Self {
        Self::with_expander(PathExpander::from_env())
    }

    pub fn with_expander(path_expander: PathExpander) -> Self {
        Self { path_expander }
    }

    /// Moves to `target` after checking it resolves to an existing directory.
    /// Returns the canonical path now in effect; on error the working
    /// directory is left alone.
    pub fn change_directory(&self, target: &Path) -> Result<PathBuf, CdError> {
        let real_path = fs::canonicalize(target).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CdError::NotFound {
                    path: target.to_path_buf(),
                }
            } else {
                CdError::Unresolvable {
                    path: target.to_path_buf(),
                    source,
                }
            }
        })?;

        let metadata = fs::metadata(&real_path).map_err(|source| CdError::Unresolvable {
            path: real_path.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(CdError::NotADirectory { path: real_path });
        }

        env::set_current_dir(&real_path).map_err(|source| CdError::Inaccessible {
            path: real_path.clone(),
            source,
        })?;

        debug!(path = %real_path.display(), "changed directory");
        Ok(real_path)
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String]) -> Result<Flow, CommandError> {
        let target = self
            .path_expander
            .expand(args.first().map(String::as_str))
            .map_err(CdError::from)?;
        self.change_directory(&target)?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::tests::CwdGuard;
    use std::ffi::OsString;

    fn cd_with_home(home: &Path) -> CdCommand {
        CdCommand::with_expander(PathExpander::with_home(Some(home.as_os_str())))
    }

    #[test]
    fn test_cd_home() {
        let _guard = CwdGuard::acquire();
        let home = tempfile::tempdir().unwrap();
        let cmd = cd_with_home(home.path());

        assert_eq!(cmd.execute(&[]).unwrap(), Flow::Continue);
        assert_eq!(
            env::current_dir().unwrap(),
            home.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_cd_tilde_prefix() {
        let _guard = CwdGuard::acquire();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(home.path().join("sub")).unwrap();
        let cmd = cd_with_home(home.path());

        cmd.execute(&["~/sub".to_string()]).unwrap();
        assert_eq!(
            env::current_dir().unwrap(),
            home.path().join("sub").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_cd_relative() {
        let _guard = CwdGuard::acquire();
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b")).unwrap();
        let cmd = cd_with_home(root.path());

        cmd.execute(&[root.path().join("a").to_string_lossy().into_owned()])
            .unwrap();
        cmd.execute(&["b".to_string()]).unwrap();
        cmd.execute(&["..".to_string()]).unwrap();
        assert_eq!(
            env::current_dir().unwrap(),
            root.path().join("a").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_cd_missing_path_keeps_cwd() {
        let _guard = CwdGuard::acquire();
        let before = env::current_dir().unwrap();
        let cmd = CdCommand::new();

        let result = cmd.execute(&["/does/not/exist".to_string()]);
        assert!(matches!(
            result,
            Err(CommandError::Cd(CdError::NotFound { .. }))
        ));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_into_file() {
        let _guard = CwdGuard::acquire();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "not a directory").unwrap();
        let cmd = CdCommand::new();

        let result = cmd.execute(&[file.to_string_lossy().into_owned()]);
        assert!(matches!(
            result,
            Err(CommandError::Cd(CdError::NotADirectory { .. }))
        ));
    }

    #[test]
    fn test_cd_through_file_component() {
        let _guard = CwdGuard::acquire();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "").unwrap();
        let cmd = CdCommand::new();

        let result = cmd.change_directory(&file.join("below"));
        assert!(matches!(result, Err(CdError::Unresolvable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_cd_symlink_to_file() {
        let _guard = CwdGuard::acquire();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&file, "").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();

        let result = CdCommand::new().change_directory(&link);
        assert!(matches!(result, Err(CdError::NotADirectory { .. })));
    }

    #[test]
    fn test_cd_without_home() {
        let _guard = CwdGuard::acquire();
        let cmd = CdCommand::with_expander(PathExpander::with_home(None::<OsString>));

        let result = cmd.execute(&[]);
        assert!(matches!(result, Err(CommandError::Cd(CdError::HomeNotSet))));
    }
}

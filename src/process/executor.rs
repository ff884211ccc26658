use std::cell::RefCell;
use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{ProcessError, SignalBridge};

/// How the wait on a child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Continued,
    /// The wait itself was cut short by Ctrl-C.
    Interrupted,
}

impl ChildStatus {
    fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ChildStatus::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            ChildStatus::Signaled(libc::WTERMSIG(status))
        } else if libc::WIFSTOPPED(status) {
            ChildStatus::Stopped(libc::WSTOPSIG(status))
        } else {
            ChildStatus::Continued
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildReport {
    pub pid: u32,
    pub status: ChildStatus,
    /// Ctrl-C arrived while the child was in the foreground.
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    signals: SignalBridge,
    /// Children whose wait was cut short; reaped once they exit.
    abandoned: RefCell<Vec<u32>>,
}

impl ProcessExecutor {
    pub fn new(signals: SignalBridge) -> Self {
        ProcessExecutor {
            signals,
            abandoned: RefCell::new(Vec::new()),
        }
    }

    /// Runs `argv[0]` (looked up on `PATH`) with the remaining tokens as its
    /// arguments and blocks until it exits, stops or continues.
    ///
    /// A program that cannot be exec'd never runs any of our code in the
    /// child: the failure comes back from `spawn` and is returned here.
    pub fn spawn_process(&self, argv: &[String]) -> Result<ChildReport, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        self.reap_abandoned();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    ProcessError::CommandNotFound(program.clone())
                } else {
                    ProcessError::Spawn {
                        program: program.clone(),
                        source,
                    }
                }
            })?;

        let pid = child.id();
        debug!(pid, program = %program, "spawned child");

        let status = self.wait_for(pid)?;
        if status == ChildStatus::Interrupted {
            self.abandoned.borrow_mut().push(pid);
        }
        let interrupted = status == ChildStatus::Interrupted || self.signals.check_and_clear();
        debug!(pid, ?status, interrupted, "child finished");

        Ok(ChildReport {
            pid,
            status,
            interrupted,
        })
    }

    /// Blocks until the child changes state. Ctrl-C ends the wait early and
    /// leaves the child running; any other signal just restarts it.
    fn wait_for(&self, pid: u32) -> Result<ChildStatus, ProcessError> {
        loop {
            let mut status: libc::c_int = 0;
            // SAFETY: `pid` is a child we just spawned and `status` outlives the call.
            let waited = unsafe {
                libc::waitpid(
                    pid as libc::pid_t,
                    &mut status,
                    libc::WUNTRACED | libc::WCONTINUED,
                )
            };
            if waited != -1 {
                return Ok(ChildStatus::from_raw(status));
            }

            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(ProcessError::Wait(err));
            }
            if self.signals.check_and_clear() {
                return Ok(ChildStatus::Interrupted);
            }
        }
    }

    fn reap_abandoned(&self) {
        self.abandoned.borrow_mut().retain(|&pid| {
            // SAFETY: `pid` is our own child; WNOHANG never blocks.
            let waited =
                unsafe { libc::waitpid(pid as libc::pid_t, std::ptr::null_mut(), libc::WNOHANG) };
            if waited == 0 {
                return true;
            }
            debug!(pid, "reaped abandoned child");
            false
        });
    }
}

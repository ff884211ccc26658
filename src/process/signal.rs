use std::io;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::SIGINT;
use tracing::debug;

/// Records Ctrl-C for the interpreter loop.
///
/// The handler only stores `true` into the shared flag; every decision about
/// what an interrupt means is made by whoever calls [`check_and_clear`].
/// Clones share the same flag.
///
/// [`check_and_clear`]: SignalBridge::check_and_clear
#[derive(Debug, Clone)]
pub struct SignalBridge {
    interrupted: Arc<AtomicBool>,
}

impl SignalBridge {
    /// Registers the SIGINT handler. Children get the default disposition
    /// back when they exec, so Ctrl-C still stops a foreground program.
    ///
    /// Blocking calls such as `waitpid` and `read` fail with `EINTR` when the
    /// signal lands, instead of being restarted.
    pub fn install() -> io::Result<Self> {
        let bridge = Self::detached();
        signal_hook::flag::register(SIGINT, Arc::clone(&bridge.interrupted))?;
        disable_restart(SIGINT)?;
        debug!("SIGINT handler installed");
        Ok(bridge)
    }

    /// A bridge with no handler behind it.
    pub fn detached() -> Self {
        Self {
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reports whether an interrupt arrived since the last call, and resets.
    pub fn check_and_clear(&self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub(crate) fn mark_interrupted(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }
}

/// signal-hook registers its handlers with `SA_RESTART`; drop the flag and
/// keep the handler, mask and remaining flags as they are.
fn disable_restart(signal: libc::c_int) -> io::Result<()> {
    // SAFETY: both calls get valid pointers; the action written back is the
    // one just read, minus a flag.
    unsafe {
        let mut action: libc::sigaction = mem::zeroed();
        if libc::sigaction(signal, ptr::null(), &mut action) != 0 {
            return Err(io::Error::last_os_error());
        }
        action.sa_flags &= !libc::SA_RESTART;
        if libc::sigaction(signal, &action, ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

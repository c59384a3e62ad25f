//! SIGINT handling.
//!
//! The handler only flips an atomic flag. The expression parser polls it and
//! abandons the current line; the read loop clears it before the next one.
//! It is installed without `SA_RESTART`, so a builtin blocked in `read`
//! sees `ErrorKind::Interrupted` and can give up.
//! While the engine is reaping children the interrupt is ignored by the
//! shell: the foreground children receive it themselves.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::debug;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
/// Number of live [`WaitGuard`]s.
static WAITING_FOR_CHILD: AtomicUsize = AtomicUsize::new(0);

extern "C" fn on_sigint(_signum: libc::c_int) {
    if WAITING_FOR_CHILD.load(Ordering::SeqCst) == 0 {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }
}

/// Install the SIGINT handler for the whole process.
pub fn install() -> io::Result<()> {
    // SAFETY: the handler only touches atomics, which is async-signal-safe,
    // and `action` is fully initialised before being handed to the kernel.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = 0;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    debug!("signals: SIGINT handler installed");
    Ok(())
}

/// Whether an interrupt arrived since the last [`clear_interrupt`].
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reset the flag and report whether it was set.
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

pub fn clear_interrupt() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Marks the process as blocked on its children until dropped.
#[must_use = "the waiting state ends when the guard is dropped"]
pub struct WaitGuard(());

/// Enter the "waiting for children" state.
pub fn waiting_for_children() -> WaitGuard {
    WAITING_FOR_CHILD.fetch_add(1, Ordering::SeqCst);
    WaitGuard(())
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        WAITING_FOR_CHILD.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
fn is_waiting_for_children() -> bool {
    WAITING_FOR_CHILD.load(Ordering::SeqCst) > 0
}

/// Serialises the tests that touch the process-wide flags.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deliver a SIGINT to the handler without going through the kernel.
#[cfg(test)]
pub(crate) fn simulate_sigint() {
    on_sigint(libc::SIGINT);
}

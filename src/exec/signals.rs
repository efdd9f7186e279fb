//! Signal dispositions for the shell and its children.

use nix::sys::signal::{SigHandler, Signal, signal};

/// Keyboard-generated signals that must reach the foreground job only.
const INTERACTIVE: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

/// Ignore interrupt, quit, and terminal-stop in the shell process.
pub fn ignore_interactive() -> nix::Result<()> {
    set_all(SigHandler::SigIgn)
}

/// Restore default handling. Runs in the child between fork and exec, so it
/// only calls `sigaction`.
pub fn restore_defaults() -> nix::Result<()> {
    set_all(SigHandler::SigDfl)
}

fn set_all(handler: SigHandler) -> nix::Result<()> {
    for sig in INTERACTIVE {
        // SAFETY: SigIgn and SigDfl install no Rust handler code.
        unsafe { signal(sig, handler) }?;
    }
    Ok(())
}

//! Built-in directives, run inside the shell process.

use std::path::Path;

use crate::error::{Result, ShellError};
use crate::parse::Builtin;
use crate::session::Session;

/// What the read-eval loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Terminate the shell with status 0.
    Exit,
}

/// Execute a validated built-in against the session.
pub fn dispatch(builtin: &Builtin, session: &mut Session) -> Result<Flow> {
    match builtin {
        Builtin::Cd(dir) => change_directory(dir, session).map(|()| Flow::Continue),
        Builtin::Exit => exit(session),
        // Job control is not implemented: both directives validate and do nothing.
        Builtin::Jobs => {
            log::debug!("jobs: no job table");
            Ok(Flow::Continue)
        }
        Builtin::Fg(id) => {
            log::debug!("fg {id}: no job table");
            Ok(Flow::Continue)
        }
    }
}

fn change_directory(dir: &str, session: &mut Session) -> Result<()> {
    let path = Path::new(dir);
    std::env::set_current_dir(path).map_err(|e| {
        log::debug!("cd {dir}: {e}");
        ShellError::InvalidDirectory(path.to_path_buf())
    })?;
    session.refresh_cwd();
    log::info!("cd {dir} -> {}", session.cwd());
    Ok(())
}

fn exit(session: &Session) -> Result<Flow> {
    match session.suspended_jobs() {
        0 => Ok(Flow::Exit),
        n => Err(ShellError::SuspendedJobs(n)),
    }
}

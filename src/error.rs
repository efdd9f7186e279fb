//! Error taxonomy for line validation, built-ins, and pipeline execution.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Error, Debug)]
pub enum ShellError {
    /// A token outside the accepted character set.
    #[error("Invalid command")]
    Grammar { token: String },

    /// Misplaced or duplicated redirection, bad pipe boundaries, built-in
    /// placement or arity, trailing tokens. The detail is only logged.
    #[error("Invalid command")]
    Structure(&'static str),

    #[error("too many tokens in one command (limit {limit})")]
    TooManyTokens { limit: usize },

    #[error("too many commands in one pipeline (limit {limit})")]
    TooManyStages { limit: usize },

    /// Missing input file or unresolvable program.
    #[error("invalid file")]
    InvalidFile(PathBuf),

    #[error("Invalid directory")]
    InvalidDirectory(PathBuf),

    #[error("there are suspended jobs")]
    SuspendedJobs(usize),

    #[error("cannot open {}: {source}", .path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create pipe: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("failed to wait for process {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// True for errors raised while validating a line, before anything spawns.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShellError::Grammar { .. }
                | ShellError::Structure(_)
                | ShellError::TooManyTokens { .. }
                | ShellError::TooManyStages { .. }
                | ShellError::InvalidFile(_)
        )
    }

    /// The one-line diagnostic written to standard error.
    pub fn diagnostic(&self) -> String {
        format!("Error: {self}")
    }

    /// Print the diagnostic to standard error and record it in the log.
    pub fn report(&self) {
        match self {
            ShellError::Grammar { token } => log::info!("rejected token {token:?}"),
            ShellError::Structure(detail) => log::info!("rejected line: {detail}"),
            ShellError::InvalidFile(path) => log::info!("invalid file: {}", path.display()),
            other if other.is_validation() => log::info!("{other}"),
            other => log::warn!("{other}"),
        }
        eprintln!("{}", self.diagnostic());
    }
}

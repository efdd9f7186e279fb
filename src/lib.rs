//! nyush: a small interactive Unix shell.
//!
//! A line is a pipeline of one or more program invocations joined by `|`.
//! The first stage may read from a file (`< in`), the last may write to one
//! (`> out` or `>> out`). A single-stage line may instead be one of the
//! built-ins `cd <dir>`, `exit`, `jobs`, `fg <id>`. Every stage of a line is
//! validated before anything runs; then each stage gets its own process.
//!
//! # Architecture
//!
//! - **[`parse`]**: Tokenizer with a fixed name grammar, stage splitting, and the command builder.
//! - **[`exec`]**: Pipeline executor: pipes, redirections, signal dispositions, waiting.
//! - **[`builtins`]**: In-process directives operating on the [`session::Session`].
//! - **[`shell`]**: The read-eval loop tying the above together.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: File logging to `~/.local/share/nyush/nyush.log`.

/// Built-in directives and the loop's control flow.
pub mod builtins;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error taxonomy and diagnostics.
pub mod error;
/// Pipeline execution and child signal handling.
pub mod exec;
/// Bounded line reading.
pub mod input;
/// Best-effort file logging.
pub mod logging;
/// Line parsing: tokens, stages, commands.
pub mod parse;
/// Persistent shell state and prompt rendering.
pub mod session;
/// Read-eval loop.
pub mod shell;

pub use builtins::Flow;
pub use error::{Result, ShellError};
pub use shell::Shell;

/// Parse a line with the default configuration, without running anything.
///
/// This is the main entry point for tests and simple usage.
pub fn validate(line: &str) -> Result<parse::ParsedLine> {
    let config = config::Config::default_config();
    let tokenizer = parse::Tokenizer::new();
    parse::parse_line(line, &tokenizer, config.limits(), &config.paths.bin_dir)
}

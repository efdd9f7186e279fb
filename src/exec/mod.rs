//! Pipeline execution: one child process per stage, joined by pipes.
//!
//! Every stage is spawned before any is waited on, so a stage that fills a
//! pipe buffer never blocks against a shell that is still waiting on an
//! earlier stage.

pub mod signals;

use std::fs::{File, OpenOptions};
use std::io::{self, PipeReader, PipeWriter};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{self, Child, Stdio};

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::error::{Result, ShellError};
use crate::parse::{Command, Pipeline};

/// How one stage of a pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Exited(i32),
    Signaled(Signal),
    /// Stopped by a job-control signal; the process is left as is.
    Stopped(Signal),
    /// Never ran: redirect, spawn, or wait failure (already reported).
    Failed,
}

impl StageOutcome {
    pub fn success(self) -> bool {
        self == StageOutcome::Exited(0)
    }
}

/// Run a validated pipeline to completion.
///
/// Failures are reported per stage and never abort the siblings; the
/// returned outcomes are in pipeline order.
pub fn run_pipeline(pipeline: &Pipeline) -> Vec<StageOutcome> {
    let commands = pipeline.commands();
    let mut outcomes = vec![StageOutcome::Failed; commands.len()];
    let mut running: Vec<(usize, Child)> = Vec::with_capacity(commands.len());
    let mut upstream: Option<PipeReader> = None;

    for (index, command) in commands.iter().enumerate() {
        let stdin = upstream.take();
        let stdout = if index + 1 < commands.len() {
            match io::pipe() {
                Ok((reader, writer)) => {
                    upstream = Some(reader);
                    Some(writer)
                }
                Err(e) => {
                    ShellError::Pipe(e).report();
                    break;
                }
            }
        } else {
            None
        };

        // The pipe ends move into the child's stdio and are closed in the
        // shell as soon as `spawn_stage` returns, success or not.
        match spawn_stage(command, stdin, stdout) {
            Ok(child) => {
                log::info!("[{index}] pid {}: {command}", child.id());
                running.push((index, child));
            }
            Err(err) => err.report(),
        }
    }
    drop(upstream);

    for (index, child) in running {
        outcomes[index] = match wait_stage(&child) {
            Ok(outcome) => {
                log::debug!("[{index}] pid {}: {outcome:?}", child.id());
                if let StageOutcome::Stopped(sig) = outcome {
                    log::warn!("pid {} stopped by {sig}; job control is unavailable", child.id());
                }
                outcome
            }
            Err(err) => {
                err.report();
                StageOutcome::Failed
            }
        };
    }
    outcomes
}

fn spawn_stage(
    command: &Command,
    stdin: Option<PipeReader>,
    stdout: Option<PipeWriter>,
) -> Result<Child> {
    let stdin = match (stdin, &command.input) {
        (Some(pipe), _) => Stdio::from(pipe),
        (None, Some(path)) => Stdio::from(open_input(path)?),
        (None, None) => Stdio::inherit(),
    };
    let stdout = match (stdout, &command.output) {
        (Some(pipe), _) => Stdio::from(pipe),
        (None, Some(path)) => Stdio::from(open_output(path, command.append)?),
        (None, None) => Stdio::inherit(),
    };

    let mut process = process::Command::new(&command.program);
    if let Some((arg0, rest)) = command.args.split_first() {
        process.arg0(arg0).args(rest);
    }
    process.stdin(stdin).stdout(stdout);
    // SAFETY: the hook only changes signal dispositions, which is
    // async-signal-safe and touches no shared memory.
    unsafe {
        process.pre_exec(|| signals::restore_defaults().map_err(io::Error::from));
    }

    process.spawn().map_err(|source| ShellError::Spawn {
        program: command.program.display().to_string(),
        source,
    })
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ShellError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}

/// Created with mode 0666 (before umask) when absent.
fn open_output(path: &Path, append: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path).map_err(|source| ShellError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}

/// Block until the child exits, dies, or stops.
fn wait_stage(child: &Child) -> Result<StageOutcome> {
    let pid = Pid::from_raw(child.id() as i32);
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(StageOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, sig, _)) => return Ok(StageOutcome::Signaled(sig)),
            Ok(WaitStatus::Stopped(_, sig)) => return Ok(StageOutcome::Stopped(sig)),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(ShellError::Wait {
                    pid: child.id(),
                    source,
                });
            }
        }
    }
}

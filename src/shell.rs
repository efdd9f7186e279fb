//! The read-eval loop: one line at a time, parse, dispatch or execute.

use std::io::{BufRead, Write};

use crate::builtins::{self, Flow};
use crate::config::Config;
use crate::error::Result;
use crate::exec;
use crate::input;
use crate::parse::{self, ParsedLine, Tokenizer};
use crate::session::Session;

/// Everything that lives for the whole shell process.
pub struct Shell {
    config: Config,
    tokenizer: Tokenizer,
    session: Session,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self::with_session(config, Session::new())
    }

    pub fn with_session(config: Config, session: Session) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompt(&self) -> String {
        self.session.prompt(&self.config.shell.name)
    }

    /// Parse one line and run it. Nothing spawns if any stage is invalid.
    pub fn eval(&mut self, line: &str) -> Result<Flow> {
        let parsed = parse::parse_line(
            line,
            &self.tokenizer,
            self.config.limits(),
            &self.config.paths.bin_dir,
        )?;
        match parsed {
            ParsedLine::Empty => Ok(Flow::Continue),
            ParsedLine::Builtin(builtin) => {
                log::debug!("builtin: {builtin:?}");
                builtins::dispatch(&builtin, &mut self.session)
            }
            ParsedLine::Pipeline(pipeline) => {
                log::info!("pipeline ({} stage(s)): {pipeline}", pipeline.len());
                exec::run_pipeline(&pipeline);
                Ok(Flow::Continue)
            }
        }
    }

    /// Like [`Shell::eval`], but reports any error as a single diagnostic
    /// line and keeps going.
    pub fn execute_line(&mut self, line: &str) -> Flow {
        match self.eval(line) {
            Ok(flow) => flow,
            Err(err) => {
                err.report();
                Flow::Continue
            }
        }
    }

    /// Prompt, read, execute until `exit` succeeds or input runs out.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: &mut R, out: &mut W) -> Result<()> {
        loop {
            write!(out, "{}", self.prompt())?;
            out.flush()?;

            let Some(line) = input::read_bounded_line(reader, self.config.shell.max_line_len)? else {
                // End of input behaves like `exit`, except there is nothing
                // left to read if it is refused.
                if let Flow::Continue = self.execute_line("exit") {
                    log::warn!("input closed with suspended jobs");
                }
                writeln!(out)?;
                return Ok(());
            };

            if self.execute_line(&line) == Flow::Exit {
                log::info!("exit");
                return Ok(());
            }
        }
    }
}

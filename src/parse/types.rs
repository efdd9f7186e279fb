//! Types produced by the line parser and consumed by the dispatcher and executor.

use std::fmt;
use std::path::PathBuf;

/// Built-in keyword, recognised only as the first token of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// `cd <dir>`
    Cd,
    /// `exit`
    Exit,
    /// `jobs`
    Jobs,
    /// `fg <job-id>`
    Fg,
}

impl BuiltinKind {
    /// Match a token against the fixed keyword set.
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "cd" => Some(BuiltinKind::Cd),
            "exit" => Some(BuiltinKind::Exit),
            "jobs" => Some(BuiltinKind::Jobs),
            "fg" => Some(BuiltinKind::Fg),
            _ => None,
        }
    }

    /// Number of argument tokens the keyword takes.
    pub fn arity(self) -> usize {
        match self {
            BuiltinKind::Cd | BuiltinKind::Fg => 1,
            BuiltinKind::Exit | BuiltinKind::Jobs => 0,
        }
    }
}

/// Lexical class of a single whitespace-delimited token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<`
    InputRedirect,
    /// `>`
    OutputTruncate,
    /// `>>`
    OutputAppend,
    Builtin(BuiltinKind),
    /// Program name or argument matching the name grammar.
    Word,
    Unrecognized,
}

impl TokenKind {
    pub fn is_redirect(self) -> bool {
        matches!(
            self,
            TokenKind::InputRedirect | TokenKind::OutputTruncate | TokenKind::OutputAppend
        )
    }

    pub fn is_output_redirect(self) -> bool {
        matches!(self, TokenKind::OutputTruncate | TokenKind::OutputAppend)
    }
}

/// A classified token. The text is owned, independent of the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// A validated built-in directive with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    Cd(String),
    Exit,
    Jobs,
    Fg(String),
}

/// One external program invocation within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Path handed to exec: the token itself if it contains `/`,
    /// otherwise resolved against the binaries directory.
    pub program: PathBuf,
    /// Argument vector; `args[0]` is the program token as typed.
    pub args: Vec<String>,
    /// Only ever set on the first stage.
    pub input: Option<PathBuf>,
    /// Only ever set on the last stage.
    pub output: Option<PathBuf>,
    /// Open `output` for append instead of truncating it.
    pub append: bool,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = self.args.iter().map(String::as_str);
        match shlex::try_join(words) {
            Ok(joined) => f.write_str(&joined)?,
            Err(_) => f.write_str(&self.args.join(" "))?,
        }
        if let Some(input) = &self.input {
            write!(f, " < {}", input.display())?;
        }
        if let Some(output) = &self.output {
            let op = if self.append { ">>" } else { ">" };
            write!(f, " {op} {}", output.display())?;
        }
        Ok(())
    }
}

/// A non-empty, ordered sequence of commands joined by pipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    commands: Vec<Command>,
}

impl Pipeline {
    /// Returns `None` for an empty command list.
    pub fn new(commands: Vec<Command>) -> Option<Self> {
        if commands.is_empty() {
            None
        } else {
            Some(Self { commands })
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false for a constructed pipeline.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Result of building a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Builtin(Builtin),
    External(Command),
}

/// Result of parsing a whole input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Blank line: nothing to do.
    Empty,
    Builtin(Builtin),
    Pipeline(Pipeline),
}

/// Parser bounds replacing fixed-capacity buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_tokens: usize,
    pub max_stages: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            max_stages: 500,
        }
    }
}

pub mod build;
pub mod line;
pub mod tokenize;
pub mod types;

pub use build::{CommandBuilder, StagePosition};
pub use line::split_stages;
pub use tokenize::Tokenizer;
pub use types::{
    Builtin, BuiltinKind, Command, Limits, ParsedLine, Pipeline, Stage, Token, TokenKind,
};

use std::path::Path;

use crate::error::{Result, ShellError};

/// Parse a full input line into a built-in or a validated pipeline.
///
/// Every stage is validated before this returns, so a failure in any stage
/// means nothing from the line runs.
pub fn parse_line(
    line: &str,
    tokenizer: &Tokenizer,
    limits: Limits,
    bin_dir: &Path,
) -> Result<ParsedLine> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ParsedLine::Empty);
    }

    let stages = split_stages(line, &limits)?;
    let builder = CommandBuilder::new(tokenizer, limits, bin_dir);
    let count = stages.len();
    let mut commands = Vec::with_capacity(count);

    for (index, stage) in stages.into_iter().enumerate() {
        match builder.build(stage, StagePosition::new(index, count))? {
            // Only reachable for a single-stage line.
            Stage::Builtin(builtin) => return Ok(ParsedLine::Builtin(builtin)),
            Stage::External(command) => commands.push(command),
        }
    }

    Pipeline::new(commands)
        .map(ParsedLine::Pipeline)
        .ok_or(ShellError::Structure("empty pipeline"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse_in(bin: &Path, line: &str) -> Result<ParsedLine> {
        parse_line(line, &Tokenizer::new(), Limits::default(), bin)
    }

    fn bin_with(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "").unwrap();
        }
        dir
    }

    #[test]
    fn blank_line_is_empty() {
        let bin = bin_with(&[]);
        assert_eq!(parse_in(bin.path(), "   ").unwrap(), ParsedLine::Empty);
        assert_eq!(parse_in(bin.path(), "").unwrap(), ParsedLine::Empty);
    }

    #[test]
    fn two_stage_pipeline() {
        let bin = bin_with(&["ls", "wc"]);
        let ParsedLine::Pipeline(p) = parse_in(bin.path(), "ls | wc -l").unwrap() else {
            panic!("expected pipeline");
        };
        assert_eq!(p.len(), 2);
        assert_eq!(p.commands()[1].args, vec!["wc", "-l"]);
    }

    #[test]
    fn sole_builtin_returned() {
        let bin = bin_with(&[]);
        assert_eq!(
            parse_in(bin.path(), "  cd /tmp  ").unwrap(),
            ParsedLine::Builtin(Builtin::Cd("/tmp".into()))
        );
    }

    #[test]
    fn builtin_in_later_stage_rejected() {
        let bin = bin_with(&["ls", "cd"]);
        assert!(matches!(
            parse_in(bin.path(), "ls | cd /tmp"),
            Err(ShellError::Structure(_))
        ));
    }

    #[test]
    fn failing_later_stage_fails_line() {
        let bin = bin_with(&["ls"]);
        assert!(matches!(
            parse_in(bin.path(), "ls | nothere"),
            Err(ShellError::InvalidFile(_))
        ));
    }

    #[test]
    fn pipe_boundaries_rejected() {
        let bin = bin_with(&["ls"]);
        assert!(matches!(parse_in(bin.path(), "| ls"), Err(ShellError::Structure(_))));
        assert!(matches!(parse_in(bin.path(), "ls |"), Err(ShellError::Structure(_))));
    }

    #[test]
    fn interior_redirect_rejected() {
        let bin = bin_with(&["ls", "wc", "sort"]);
        assert!(matches!(
            parse_in(bin.path(), "ls | wc > out | sort"),
            Err(ShellError::Structure(_))
        ));
    }
}

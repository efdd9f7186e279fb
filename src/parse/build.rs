use std::path::{Path, PathBuf};

use super::tokenize::Tokenizer;
use super::types::{Builtin, BuiltinKind, Command, Limits, Stage, Token, TokenKind};
use crate::error::{Result, ShellError};

/// Where a stage sits in its pipeline; decides which constructs it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePosition {
    /// `< file` allowed.
    pub first: bool,
    /// `> file` / `>> file` allowed.
    pub last: bool,
    /// Built-ins allowed (the pipeline has exactly one stage).
    pub sole: bool,
}

impl StagePosition {
    pub fn new(index: usize, count: usize) -> Self {
        Self {
            first: index == 0,
            last: index + 1 == count,
            sole: count == 1,
        }
    }
}

/// Turns one stage substring into a validated [`Stage`].
///
/// Building never executes anything; a built-in is returned to the caller
/// for dispatch.
pub struct CommandBuilder<'a> {
    tokenizer: &'a Tokenizer,
    limits: Limits,
    bin_dir: &'a Path,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(tokenizer: &'a Tokenizer, limits: Limits, bin_dir: &'a Path) -> Self {
        Self {
            tokenizer,
            limits,
            bin_dir,
        }
    }

    pub fn build(&self, stage: &str, position: StagePosition) -> Result<Stage> {
        let tokens = self.tokenizer.tokenize(stage, &self.limits)?;
        let Some(head) = tokens.first() else {
            return Err(ShellError::Structure("empty pipeline stage"));
        };

        match head.kind {
            TokenKind::Builtin(kind) => build_builtin(kind, &tokens, position).map(Stage::Builtin),
            TokenKind::Word => self.build_external(&tokens, position).map(Stage::External),
            TokenKind::InputRedirect | TokenKind::OutputTruncate | TokenKind::OutputAppend => {
                Err(ShellError::Structure("redirection before program"))
            }
            TokenKind::Unrecognized => Err(ShellError::Grammar {
                token: head.text.clone(),
            }),
        }
    }

    fn build_external(&self, tokens: &[Token], position: StagePosition) -> Result<Command> {
        let has_input = tokens.iter().any(|t| t.kind == TokenKind::InputRedirect);
        let has_output = tokens.iter().any(|t| t.kind.is_output_redirect());
        if has_input && !position.first {
            return Err(ShellError::Structure("input redirection outside first command"));
        }
        if has_output && !position.last {
            return Err(ShellError::Structure("output redirection outside last command"));
        }

        // A missing input file is reported before anything after its
        // operand is looked at.
        if let Some(at) = tokens.iter().position(|t| t.kind == TokenKind::InputRedirect) {
            let Some(target) = tokens.get(at + 1).filter(|t| t.kind == TokenKind::Word) else {
                return Err(ShellError::Structure("redirection target is not a file name"));
            };
            if !Path::new(&target.text).is_file() {
                return Err(ShellError::InvalidFile(PathBuf::from(&target.text)));
            }
        }

        // Arguments run up to the first operator; everything after must be
        // exactly `op target` pairs.
        let split = tokens
            .iter()
            .position(|t| t.kind.is_redirect())
            .unwrap_or(tokens.len());
        let (words, redirects) = tokens.split_at(split);

        let mut input = None;
        let mut output = None;
        let mut append = false;
        for pair in redirects.chunks(2) {
            let [op, target] = pair else {
                return Err(ShellError::Structure("redirection without target"));
            };
            if target.kind != TokenKind::Word {
                return Err(ShellError::Structure("redirection target is not a file name"));
            }
            match op.kind {
                TokenKind::InputRedirect => input = Some(PathBuf::from(&target.text)),
                TokenKind::OutputTruncate => output = Some(PathBuf::from(&target.text)),
                TokenKind::OutputAppend => {
                    output = Some(PathBuf::from(&target.text));
                    append = true;
                }
                TokenKind::Builtin(_) | TokenKind::Word | TokenKind::Unrecognized => {
                    return Err(ShellError::Structure("trailing tokens after redirection"));
                }
            }
        }

        let program = self.resolve_program(&words[0].text)?;
        Ok(Command {
            program,
            args: words.iter().map(|t| t.text.clone()).collect(),
            input,
            output,
            append,
        })
    }

    /// A name containing `/` is used verbatim; a bare name must exist as a
    /// regular file in the binaries directory.
    fn resolve_program(&self, name: &str) -> Result<PathBuf> {
        if name.contains('/') {
            return Ok(PathBuf::from(name));
        }
        let path = self.bin_dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ShellError::InvalidFile(path))
        }
    }
}

fn build_builtin(kind: BuiltinKind, tokens: &[Token], position: StagePosition) -> Result<Builtin> {
    if !position.sole {
        return Err(ShellError::Structure("built-in inside a pipeline"));
    }
    if tokens.iter().any(|t| t.kind.is_redirect()) {
        return Err(ShellError::Structure("built-in with redirection"));
    }
    let args = &tokens[1..];
    if args.len() != kind.arity() {
        return Err(ShellError::Structure("wrong number of built-in arguments"));
    }
    Ok(match kind {
        BuiltinKind::Cd => Builtin::Cd(args[0].text.clone()),
        BuiltinKind::Fg => Builtin::Fg(args[0].text.clone()),
        BuiltinKind::Exit => Builtin::Exit,
        BuiltinKind::Jobs => Builtin::Jobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SOLE: StagePosition = StagePosition {
        first: true,
        last: true,
        sole: true,
    };

    /// A scratch binaries directory holding a fake `cat` and `ls`.
    fn bin_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cat"), "").unwrap();
        fs::write(dir.path().join("ls"), "").unwrap();
        dir
    }

    fn build(stage: &str, position: StagePosition) -> Result<Stage> {
        let bin = bin_dir();
        let tokenizer = Tokenizer::new();
        CommandBuilder::new(&tokenizer, Limits::default(), bin.path()).build(stage, position)
    }

    fn external(stage: &str, position: StagePosition) -> Command {
        match build(stage, position).unwrap() {
            Stage::External(cmd) => cmd,
            Stage::Builtin(b) => panic!("expected external command, got {b:?}"),
        }
    }

    fn is_structural(result: Result<Stage>) -> bool {
        matches!(result, Err(ShellError::Structure(_)))
    }

    #[test]
    fn position_flags() {
        assert_eq!(StagePosition::new(0, 1), SOLE);
        let middle = StagePosition::new(1, 3);
        assert!(!middle.first && !middle.last && !middle.sole);
        let last = StagePosition::new(2, 3);
        assert!(last.last && !last.first);
    }

    #[test]
    fn simple_command_resolves_in_bin_dir() {
        let cmd = external("ls -la", SOLE);
        assert!(cmd.program.ends_with("ls"));
        assert_eq!(cmd.args, vec!["ls", "-la"]);
        assert!(cmd.input.is_none() && cmd.output.is_none());
    }

    #[test]
    fn slash_program_used_verbatim() {
        let cmd = external("./not/checked arg", SOLE);
        assert_eq!(cmd.program, PathBuf::from("./not/checked"));
        assert_eq!(cmd.args[0], "./not/checked");
    }

    #[test]
    fn missing_program_is_invalid_file() {
        assert!(matches!(
            build("definitely-not-here", SOLE),
            Err(ShellError::InvalidFile(_))
        ));
    }

    #[test]
    fn output_truncate_and_append() {
        let cmd = external("ls > out.txt", SOLE);
        assert_eq!(cmd.output, Some(PathBuf::from("out.txt")));
        assert!(!cmd.append);
        let cmd = external("ls >> out.txt", SOLE);
        assert!(cmd.append);
        assert_eq!(cmd.args, vec!["ls"]);
    }

    #[test]
    fn input_and_output_in_either_order() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        for stage in [
            format!("cat -n < {path} > out"),
            format!("cat -n > out < {path}"),
        ] {
            let cmd = external(&stage, SOLE);
            assert_eq!(cmd.args, vec!["cat", "-n"]);
            assert_eq!(cmd.input.as_deref(), Some(input.path()));
            assert_eq!(cmd.output, Some(PathBuf::from("out")));
        }
    }

    #[test]
    fn trailing_tokens_rejected() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        assert!(is_structural(build(&format!("cat < {path} extra"), SOLE)));
        assert!(is_structural(build(&format!("cat < {path} arg > out"), SOLE)));
    }

    #[test]
    fn missing_input_wins_over_later_structure() {
        for stage in [
            "cat < /no/such/file extra",
            "cat < /no/such/file >",
            "cat > out < /no/such/file",
        ] {
            assert!(
                matches!(build(stage, SOLE), Err(ShellError::InvalidFile(_))),
                "{stage}"
            );
        }
        // The operand itself must still be a file name.
        assert!(is_structural(build("cat < >", SOLE)));
    }

    #[test]
    fn redirect_without_target_rejected() {
        assert!(is_structural(build("ls >", SOLE)));
        assert!(is_structural(build("cat < > out", SOLE)));
    }

    #[test]
    fn redirect_first_rejected() {
        assert!(is_structural(build("< in cat", SOLE)));
    }

    #[test]
    fn missing_input_is_invalid_file() {
        assert!(matches!(
            build("cat < /no/such/file", SOLE),
            Err(ShellError::InvalidFile(_))
        ));
    }

    #[test]
    fn directory_input_is_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let stage = format!("cat < {}", dir.path().display());
        assert!(matches!(build(&stage, SOLE), Err(ShellError::InvalidFile(_))));
    }

    #[test]
    fn input_only_on_first_stage() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let stage = format!("cat < {}", input.path().display());
        assert!(is_structural(build(&stage, StagePosition::new(1, 2))));
        assert!(build(&stage, StagePosition::new(0, 2)).is_ok());
    }

    #[test]
    fn output_only_on_last_stage() {
        assert!(is_structural(build("ls > out", StagePosition::new(0, 2))));
        assert!(build("ls > out", StagePosition::new(1, 2)).is_ok());
    }

    #[test]
    fn builtin_cd_and_fg() {
        assert_eq!(build("cd /tmp", SOLE).unwrap(), Stage::Builtin(Builtin::Cd("/tmp".into())));
        assert_eq!(build("fg 1", SOLE).unwrap(), Stage::Builtin(Builtin::Fg("1".into())));
        assert_eq!(build("exit", SOLE).unwrap(), Stage::Builtin(Builtin::Exit));
        assert_eq!(build("jobs", SOLE).unwrap(), Stage::Builtin(Builtin::Jobs));
    }

    #[test]
    fn builtin_arity_checked() {
        assert!(is_structural(build("cd", SOLE)));
        assert!(is_structural(build("cd a b", SOLE)));
        assert!(is_structural(build("exit now", SOLE)));
        assert!(is_structural(build("jobs -l", SOLE)));
        assert!(is_structural(build("fg", SOLE)));
    }

    #[test]
    fn builtin_in_pipeline_rejected() {
        assert!(is_structural(build("exit", StagePosition::new(0, 2))));
        assert!(is_structural(build("cd /tmp", StagePosition::new(1, 2))));
    }

    #[test]
    fn builtin_with_redirect_rejected() {
        assert!(is_structural(build("jobs > out", SOLE)));
        assert!(is_structural(build("cd < dir", SOLE)));
    }
}

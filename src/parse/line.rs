use super::types::Limits;
use crate::error::{Result, ShellError};

/// Split a trimmed line at `|` into stage substrings.
///
/// The number of stages is always one more than the number of pipe
/// operators: a leading or trailing pipe, or an empty stage between two
/// pipes, is rejected rather than collapsed.
pub fn split_stages<'a>(line: &'a str, limits: &Limits) -> Result<Vec<&'a str>> {
    if line.starts_with('|') || line.ends_with('|') {
        return Err(ShellError::Structure("pipe at line boundary"));
    }
    let mut stages = Vec::new();
    for part in line.split('|') {
        if part.trim().is_empty() {
            return Err(ShellError::Structure("empty pipeline stage"));
        }
        if stages.len() == limits.max_stages {
            return Err(ShellError::TooManyStages {
                limit: limits.max_stages,
            });
        }
        stages.push(part);
    }
    Ok(stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Result<Vec<&str>> {
        split_stages(line, &Limits::default())
    }

    #[test]
    fn split_single() {
        assert_eq!(split("ls -la").unwrap(), vec!["ls -la"]);
    }

    #[test]
    fn split_pipe() {
        assert_eq!(split("cat file | grep pat").unwrap(), vec!["cat file ", " grep pat"]);
    }

    #[test]
    fn split_count_matches_operators() {
        let line = "a | b | c | d";
        let stages = split(line).unwrap();
        assert_eq!(stages.len(), line.matches('|').count() + 1);
    }

    #[test]
    fn leading_pipe_rejected() {
        assert!(matches!(split("| ls"), Err(ShellError::Structure(_))));
    }

    #[test]
    fn trailing_pipe_rejected() {
        assert!(matches!(split("ls |"), Err(ShellError::Structure(_))));
    }

    #[test]
    fn double_pipe_rejected() {
        assert!(matches!(split("ls || wc"), Err(ShellError::Structure(_))));
    }

    #[test]
    fn blank_stage_rejected() {
        assert!(matches!(split("ls |   | wc"), Err(ShellError::Structure(_))));
    }

    #[test]
    fn stage_limit_enforced() {
        let limits = Limits {
            max_tokens: 10,
            max_stages: 2,
        };
        assert!(split_stages("a | b", &limits).is_ok());
        assert!(matches!(
            split_stages("a | b | c", &limits),
            Err(ShellError::TooManyStages { limit: 2 })
        ));
    }
}

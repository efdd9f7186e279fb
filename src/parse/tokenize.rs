use regex::Regex;

use super::types::{BuiltinKind, Limits, Token, TokenKind};
use crate::error::{Result, ShellError};

/// Characters accepted in program names and arguments. Excludes whitespace,
/// quotes, globbing, history expansion, and the pipe/redirection characters.
const NAME_PATTERN: &str = r"^[a-zA-Z0-9_#$%&+,./:;=?@~-]+$";

/// Classifies whitespace-separated words against the shell's fixed grammar.
///
/// Holds the compiled name matcher, so build it once and reuse it.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    name: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            name: Regex::new(NAME_PATTERN).expect("name grammar must compile"),
        }
    }

    /// Classify one token. Operators win, then built-in keywords (first
    /// token of a stage only), then the name grammar.
    pub fn classify(&self, text: &str, first_in_stage: bool) -> TokenKind {
        match text {
            ">" => return TokenKind::OutputTruncate,
            ">>" => return TokenKind::OutputAppend,
            "<" => return TokenKind::InputRedirect,
            _ => {}
        }
        if first_in_stage && let Some(kind) = BuiltinKind::from_keyword(text) {
            return TokenKind::Builtin(kind);
        }
        if self.name.is_match(text) {
            TokenKind::Word
        } else {
            TokenKind::Unrecognized
        }
    }

    /// Split a stage on whitespace and classify every token.
    ///
    /// Stops at the first unrecognized token or repeated redirect operator.
    pub fn tokenize(&self, stage: &str, limits: &Limits) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let (mut seen_input, mut seen_output) = (false, false);

        for text in stage.split_whitespace() {
            if tokens.len() == limits.max_tokens {
                return Err(ShellError::TooManyTokens {
                    limit: limits.max_tokens,
                });
            }
            let kind = self.classify(text, tokens.is_empty());
            match kind {
                TokenKind::InputRedirect => {
                    if seen_input {
                        return Err(ShellError::Structure("duplicate input redirection"));
                    }
                    seen_input = true;
                }
                TokenKind::OutputTruncate | TokenKind::OutputAppend => {
                    if seen_output {
                        return Err(ShellError::Structure("duplicate output redirection"));
                    }
                    seen_output = true;
                }
                TokenKind::Unrecognized => {
                    return Err(ShellError::Grammar { token: text.to_string() });
                }
                TokenKind::Builtin(_) | TokenKind::Word => {}
            }
            tokens.push(Token {
                kind,
                text: text.to_string(),
            });
        }
        Ok(tokens)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

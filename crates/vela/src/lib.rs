//! Vela interpreter: orchestrates the full pipeline.
//!
//! ```text
//! Vela Source → Lexer → Parser → Evaluator → output
//! ```
//!
//! The three entry points a host needs are [`tokenize`], [`parse`] and
//! [`run`]. Each call is independent; [`Session`] keeps the results of the
//! most recent run for hosts that display them later.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use vela_eval::{Env, EvalConfig, EvalError, Evaluator, RuntimeError, Value, ValueType};
pub use vela_lexer::Lexer;
pub use vela_parser::{ParseResult, Parser};
pub use vela_types::{ast, Diagnostic, Diagnostics, ErrorCode, Span, Token, TokenKind};

/// Text shown by [`RunOutput::display`] when the program had syntax errors.
pub const BUILD_FAILED: &str = "Build failed";

// ══════════════════════════════════════════════════════════════════════════════
// Entry points
// ══════════════════════════════════════════════════════════════════════════════

/// Drain the lexer. The last token is always the single end-of-input token.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex and parse `source`, collecting every syntax diagnostic.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(Lexer::new(source)).parse()
}

/// Lex, parse and evaluate `source` in a fresh environment with default
/// limits.
pub fn run(source: &str) -> Result<RunOutput, EvalError> {
    run_with_config(source, EvalConfig::default())
}

/// Like [`run`], with explicit evaluator limits.
///
/// The (possibly partial) program is evaluated even when there are syntax
/// diagnostics; [`RunOutput::build_failed`] tells the host to report them
/// instead of the output.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn run_with_config(source: &str, config: EvalConfig) -> Result<RunOutput, EvalError> {
    let ParseResult {
        program,
        diagnostics,
    } = parse(source);
    if !diagnostics.is_empty() {
        debug!(count = diagnostics.len(), "build failed");
    }

    let env = Env::new();
    let value = Evaluator::with_config(config).eval_program(&program, &env);
    // Functions bound at top level capture `env`; drop them to break the cycle.
    env.clear();
    let value = value?;
    Ok(RunOutput {
        output: value.map(|v| v.inspect()),
        diagnostics: diagnostics.messages(),
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Results
// ══════════════════════════════════════════════════════════════════════════════

/// Outcome of [`run`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunOutput {
    /// Printable form of the program's result; `None` when the program
    /// produced no value.
    pub output: Option<String>,
    /// Syntax diagnostics in source order.
    pub diagnostics: Vec<String>,
}

impl RunOutput {
    pub fn build_failed(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Text for the host's output pane.
    pub fn display(&self) -> &str {
        if self.build_failed() {
            BUILD_FAILED
        } else {
            self.output.as_deref().unwrap_or("")
        }
    }
}

/// Serializable view of a [`ParseResult`] with the program rendered in
/// canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseSummary {
    pub program: String,
    pub statements: usize,
    pub diagnostics: Diagnostics,
}

impl From<ParseResult> for ParseSummary {
    fn from(result: ParseResult) -> Self {
        Self {
            program: result.program.to_string(),
            statements: result.program.statements.len(),
            diagnostics: result.diagnostics,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Session
// ══════════════════════════════════════════════════════════════════════════════

/// Host-side record of the most recent run: its token log, error log and
/// output. Every [`Session::run`] starts from empty logs.
#[derive(Debug, Default)]
pub struct Session {
    config: EvalConfig,
    tokens: Vec<Token>,
    errors: Vec<String>,
    output: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Run `source`, replacing everything recorded by the previous run.
    ///
    /// A host-level [`EvalError`] is recorded in the error log and also
    /// returned.
    pub fn run(&mut self, source: &str) -> Result<&str, EvalError> {
        self.clear();
        self.tokens = tokenize(source);

        match run_with_config(source, self.config) {
            Ok(result) => {
                self.output = result.display().to_string();
                self.errors = result.diagnostics;
                Ok(&self.output)
            }
            Err(err) => {
                self.errors.push(err.to_string());
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.errors.clear();
        self.output.clear();
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_build_failed() {
        let out = RunOutput {
            output: Some("5".into()),
            diagnostics: vec!["expected '=', got '5'".into()],
        };
        assert!(out.build_failed());
        assert_eq!(out.display(), BUILD_FAILED);
    }

    #[test]
    fn test_display_without_output_is_empty() {
        assert_eq!(RunOutput::default().display(), "");
    }
}

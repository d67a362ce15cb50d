//! Vela interpreter as a WASM module for browser environments.
//!
//! Every export takes source text and returns a JSON string, so the host
//! needs nothing beyond `JSON.parse`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run, tokenize } from 'vela-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(run("var f = function(x){ x * 2 }; f(21);"));
//! // { success: true, display: "42", output: "42", diagnostics: [], error: null }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// JSON shape returned by [`run`].
#[derive(Debug, Serialize)]
struct RunResponse {
    /// `false` on syntax diagnostics or a host-level trap.
    success: bool,
    /// Text for the output pane.
    display: String,
    output: Option<String>,
    diagnostics: Vec<String>,
    /// Host-level trap message, if evaluation was aborted.
    error: Option<String>,
}

impl RunResponse {
    fn from_result(result: Result<vela::RunOutput, vela::EvalError>) -> Self {
        match result {
            Ok(out) => Self {
                success: !out.build_failed(),
                display: out.display().to_string(),
                output: out.output,
                diagnostics: out.diagnostics,
                error: None,
            },
            Err(err) => Self {
                success: false,
                display: String::new(),
                output: None,
                diagnostics: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"error":"Serialization error: {}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

/// Tokenize Vela source.
///
/// Returns a JSON array of tokens, ending with the end-of-input token:
/// ```json
/// [{ "kind": "Var", "literal": "var", "span": { ... } }, ...]
/// ```
#[wasm_bindgen]
pub fn tokenize(source: &str) -> String {
    to_json(&vela::tokenize(source))
}

/// Parse Vela source.
///
/// Returns `{ "program": "<canonical form>", "statements": n,
/// "diagnostics": [...] }`.
#[wasm_bindgen]
pub fn parse(source: &str) -> String {
    to_json(&vela::ParseSummary::from(vela::parse(source)))
}

/// Run Vela source in a fresh environment.
#[wasm_bindgen]
pub fn run(source: &str) -> String {
    to_json(&RunResponse::from_result(vela::run(source)))
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

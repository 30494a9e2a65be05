//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}
//!
//! also provides format string templating for flexible scripting support

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;

use crate::entity::Entity;
use crate::filter::{Instruction, LabelFilter, Token, TokenKind};

use super::error::CommandError;

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
    /// one entity name per line, ideal for piping to xargs
    Names,
    /// custom format string with {field} placeholders
    Format,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > names > format > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool, names: bool, format: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if names {
            return Self::Names;
        }
        if format {
            return Self::Format;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// error code (using lfilter exit codes, offset by -32000 for app-specific errors)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    /// create error with standard JSON-RPC error code range
    /// lfilter uses -32000 to -32099 for application errors (per JSON-RPC spec)
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn from_command_error(e: &CommandError) -> Self {
        let mut error = Self::new(e.code, e.message.clone());
        if e.has_suggestions() || e.details.is_some() {
            error.error.data = Some(ErrorData {
                suggestions: if e.suggestions.is_empty() {
                    None
                } else {
                    Some(e.suggestions.clone())
                },
                details: e.details.clone(),
            });
        }
        error
    }
}

/// convert lfilter exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for the match command
#[derive(Serialize)]
pub struct MatchData {
    pub filter: String,
    pub matched: bool,
    pub labels: BTreeMap<String, String>,
}

/// result data for the select command
#[derive(Serialize)]
pub struct SelectData<'a> {
    pub filter: String,
    pub total: usize,
    pub matched: usize,
    pub entities: Vec<&'a Entity>,
}

/// result data for the check command
#[derive(Serialize)]
pub struct CheckData {
    pub filter: String,
    pub valid: bool,
    pub program: String,
}

/// result data for the explain command
#[derive(Serialize)]
pub struct ExplainData {
    pub filter: String,
    pub tokens: Vec<TokenData>,
    pub program: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Serialize)]
pub struct TokenData {
    pub kind: &'static str,
    pub text: String,
    pub offset: usize,
}

impl From<&Token> for TokenData {
    fn from(token: &Token) -> Self {
        Self {
            kind: token_kind_name(token.kind),
            text: token.text.clone(),
            offset: token.offset,
        }
    }
}

pub fn token_kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Quoted => "quoted",
        TokenKind::Symbol => "symbol",
        TokenKind::Word => "word",
    }
}

impl ExplainData {
    pub fn new(filter: &LabelFilter, tokens: &[Token]) -> Self {
        Self {
            filter: filter.expression().to_string(),
            tokens: tokens.iter().map(TokenData::from).collect(),
            program: filter
                .program()
                .iter()
                .map(Instruction::to_string)
                .collect(),
            labels: filter
                .referenced_labels()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

// ============================================================================
// Output functions
// ============================================================================

/// format a string template with {field} placeholders
///
/// nested objects are reachable with dotted placeholders, e.g. `{labels.role}`;
/// the object itself renders as `key=value` pairs
///
/// # example
/// ```ignore
/// let entity = Entity::new("node-1").with_label("role", "controller");
/// let result = format_template("{name} ({labels.role})", &entity);
/// assert_eq!(result, "node-1 (controller)");
/// ```
pub fn format_template<T: Serialize>(template: &str, data: &T) -> String {
    let value = match serde_json::to_value(data) {
        Ok(v) => v,
        Err(_) => return template.to_string(),
    };

    let mut result = template.to_string();

    if let serde_json::Value::Object(map) = value {
        for (key, val) in map {
            if let serde_json::Value::Object(inner) = &val {
                for (sub_key, sub_val) in inner {
                    let placeholder = format!("{{{}.{}}}", key, sub_key);
                    result = result.replace(&placeholder, &scalar_text(sub_val));
                }
            }
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, &scalar_text(&val));
        }
    }

    result
}

fn scalar_text(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(arr) => {
            // join array elements with comma
            arr.iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(", ")
        }
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, scalar_text(v)))
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// one entity as a text line: name followed by its labels
pub fn entity_line(entity: &Entity) -> String {
    if entity.labels.is_empty() {
        return entity.name.clone();
    }
    let labels = entity
        .labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}\t{}", entity.name, labels)
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print a command error the way the output mode asks for
///
/// JSON mode writes a JSON-RPC error to stdout, every other mode writes to stderr
pub fn print_error(mode: OutputMode, e: &CommandError) {
    if mode.is_json() {
        if let Ok(json) = serde_json::to_string(&JsonRpcError::from_command_error(e)) {
            println!("{}", json);
        }
        return;
    }

    eprintln!("Error: {}", e.message);
    if let Some(details) = &e.details {
        for line in details.lines() {
            eprintln!("  {}", line);
        }
    }
    if e.has_suggestions() {
        eprintln!("Did you mean: {}", e.suggestions.join(", "));
    }
}

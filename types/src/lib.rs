//! Core domain types for fanout.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod chunk;
pub use chunk::{Chunk, ChunkSize};

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Handler Names
// ============================================================================

/// A handler name guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandlerName(String);

#[derive(Debug, Error)]
#[error("handler name must not be empty")]
pub struct EmptyNameError;

impl HandlerName {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyNameError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyNameError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HandlerName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for HandlerName {
    type Error = EmptyNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HandlerName> for String {
    fn from(value: HandlerName) -> Self {
        value.0
    }
}

impl AsRef<str> for HandlerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Extra Arguments
// ============================================================================

/// Ordered, fixed list of values appended to every handler invocation of one
/// run. Cloning is cheap; all invocations share the same storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtraArgs(Arc<[Value]>);

impl ExtraArgs {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into())
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Positional lookup; `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Positional lookup for string arguments.
    #[must_use]
    pub fn str_at(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }
}

impl Deref for ExtraArgs {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for ExtraArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for ExtraArgs {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for ExtraArgs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

// ============================================================================
// Run Policies
// ============================================================================

/// Concurrency policy used to drive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPolicy {
    /// Chunks run one after another; elements inside a chunk run together.
    #[default]
    Elementwise,
    /// One handler call per chunk; all chunks run together.
    Chunkwise,
    /// Every element runs together, no chunking.
    Concurrent,
}

impl RunPolicy {
    pub const ALL: [RunPolicy; 3] = [Self::Elementwise, Self::Chunkwise, Self::Concurrent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Elementwise => "elementwise",
            Self::Chunkwise => "chunkwise",
            Self::Concurrent => "concurrent",
        }
    }

    /// Whether the policy partitions the collection before dispatch.
    #[must_use]
    pub const fn uses_chunks(self) -> bool {
        !matches!(self, Self::Concurrent)
    }

    /// Parse policy from string, accepting a few common aliases.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elementwise" | "element" | "bounded" => Some(Self::Elementwise),
            "chunkwise" | "chunk" | "chunks" => Some(Self::Chunkwise),
            "concurrent" | "parallel" | "all" => Some(Self::Concurrent),
            _ => None,
        }
    }
}

impl fmt::Display for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown run policy: {0} (expected elementwise, chunkwise or concurrent)")]
pub struct PolicyParseError(String);

impl FromStr for RunPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PolicyParseError(s.to_string()))
    }
}

// ============================================================================
// Unit Outcomes
// ============================================================================

/// Failure of one handler invocation.
///
/// Serializable so that failure reports can carry a structured payload.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerError {
    #[error("Bad handler args: {message}")]
    BadArgs { message: String },
    #[error("Unsupported input: expected {expected}, got {found}")]
    UnsupportedInput { expected: String, found: String },
    #[error("Handler failed: {message}")]
    Failed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
    #[error("Handler panicked: {message}")]
    Panicked { message: String },
}

impl HandlerError {
    #[must_use]
    pub fn bad_args(message: impl Into<String>) -> Self {
        Self::BadArgs {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn failed_with(message: impl Into<String>, detail: Value) -> Self {
        Self::Failed {
            message: message.into(),
            detail: Some(detail),
        }
    }

    #[must_use]
    pub fn unsupported(expected: impl Into<String>, found: &Value) -> Self {
        Self::UnsupportedInput {
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }

    /// Pretty-printed JSON form used in failure logs.
    #[must_use]
    pub fn payload(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
    }
}

/// Outcome of one handler invocation.
pub type UnitOutcome<R> = Result<R, HandlerError>;

/// Where a reported failure was isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "index", rename_all = "snake_case")]
pub enum FailureScope {
    /// A single element's slot was dropped.
    Element(usize),
    /// A whole chunk's results were dropped.
    Chunk(usize),
}

impl fmt::Display for FailureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(index) => write!(f, "element {index}"),
            Self::Chunk(index) => write!(f, "chunk {index}"),
        }
    }
}

/// Short JSON type name for diagnostics.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

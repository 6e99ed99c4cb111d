// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Field-normalized structural comparison of JSON messages

use serde_json::{Map, Value};

/// Result of comparing one expected payload against one actual line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    Mismatched,
    /// The transcript payload is not valid JSON.
    ExpectedUnparseable(String),
    /// The line read from the peer is not valid JSON.
    ActualUnparseable(String),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }

    /// Parser message when either side failed to parse.
    pub fn parse_error(&self) -> Option<&str> {
        match self {
            MatchOutcome::ExpectedUnparseable(msg) | MatchOutcome::ActualUnparseable(msg) => {
                Some(msg)
            }
            _ => None,
        }
    }
}

/// Compares expected transcript messages against live ones.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    project_root: String,
}

impl MatchEngine {
    pub fn new(project_root: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Parse both sides, normalize the expected one, then compare structurally.
    pub fn compare(&self, expected: &str, actual: &str) -> MatchOutcome {
        let expected: Value = match serde_json::from_str(expected) {
            Ok(value) => value,
            Err(e) => return MatchOutcome::ExpectedUnparseable(e.to_string()),
        };
        let actual: Value = match serde_json::from_str(actual) {
            Ok(value) => value,
            Err(e) => return MatchOutcome::ActualUnparseable(e.to_string()),
        };

        let expected = normalize_cwd(expected, &self.project_root);
        if json_eq(&expected, &actual) {
            MatchOutcome::Matched
        } else {
            MatchOutcome::Mismatched
        }
    }
}

/// Rewrite `params.cwd` to `project_root` when both levels are present.
///
/// Only a top-level object with an object-valued `params` holding `cwd` is
/// touched. Nothing is inserted when either key is missing.
pub fn normalize_cwd(mut message: Value, project_root: &str) -> Value {
    if let Some(cwd) = message
        .as_object_mut()
        .and_then(|obj| obj.get_mut("params"))
        .and_then(Value::as_object_mut)
        .and_then(|params| params.get_mut("cwd"))
    {
        *cwd = Value::String(project_root.to_string());
    }
    message
}

/// Deep equality over the JSON variants.
///
/// Objects compare as key sets with recursive values, arrays index-wise,
/// numbers with serde_json's own equality (so `1` and `1.0` differ).
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => objects_eq(x, y),
        _ => false,
    }
}

fn objects_eq(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| json_eq(value, other)))
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Declarative path extraction over untyped resource documents.

use crate::error::{HeraldError, Result};
use jsonpath_lib::Compiled;
use serde_json::Value;
use std::fmt;

/// A validated path expression that extracts exactly one scalar from a
/// semi-structured document.
///
/// Syntax errors surface at [`AttributePath::parse`] so admission can reject
/// a bad ServiceClass before any resource is mapped; everything else is an
/// evaluation-time [`HeraldError::AmbiguousOrMissingPath`].
pub struct AttributePath {
    expr: String,
    compiled: Compiled,
}

impl AttributePath {
    /// Compile a path expression. Accepts both rooted JSONPath (`$.spec.host`)
    /// and the Kubernetes-style relative form (`.spec.host`).
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(HeraldError::InvalidPathSyntax {
                path: expr.to_string(),
                reason: "empty expression".to_string(),
            });
        }

        let rooted = if trimmed.starts_with('$') {
            trimmed.to_string()
        } else if trimmed.starts_with('.') {
            format!("${trimmed}")
        } else {
            format!("$.{trimmed}")
        };

        let compiled = Compiled::compile(&rooted).map_err(|e| HeraldError::InvalidPathSyntax {
            path: expr.to_string(),
            reason: e.to_string(),
        })?;

        Ok(AttributePath {
            expr: expr.to_string(),
            compiled,
        })
    }

    /// Evaluate against a document, requiring exactly one scalar match.
    /// Scalars are stringified canonically: strings verbatim, everything
    /// else through its JSON representation.
    pub fn extract(&self, document: &Value) -> Result<String> {
        let matches = self
            .compiled
            .select(document)
            .map_err(|e| HeraldError::AmbiguousOrMissingPath {
                path: self.expr.clone(),
                reason: format!("{e:?}"),
            })?;

        match matches.as_slice() {
            [] => Err(HeraldError::AmbiguousOrMissingPath {
                path: self.expr.clone(),
                reason: "no value matched".to_string(),
            }),
            [single] => canonical_scalar(single).ok_or_else(|| {
                HeraldError::AmbiguousOrMissingPath {
                    path: self.expr.clone(),
                    reason: "matched a non-scalar value".to_string(),
                }
            }),
            many => Err(HeraldError::AmbiguousOrMissingPath {
                path: self.expr.clone(),
                reason: format!("{} values matched", many.len()),
            }),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }
}

impl fmt::Debug for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributePath")
            .field("expr", &self.expr)
            .finish()
    }
}

fn canonical_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Null => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

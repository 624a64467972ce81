// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("invalid path expression '{path}': {reason}")]
    InvalidPathSyntax { path: String, reason: String },

    #[error("path '{path}' did not resolve to exactly one scalar: {reason}")]
    AmbiguousOrMissingPath { path: String, reason: String },

    #[error("secret key '{namespace}/{secret}:{key}' not found")]
    SecretKeyNotFound {
        namespace: String,
        secret: String,
        key: String,
    },

    #[error("malformed bootstrap secret: {0}")]
    MalformedBootstrap(String),

    #[error("remote cluster is offline: {0}")]
    ConnectivityOffline(String),

    #[error("unknown resource type {api_version}/{kind}: {reason}")]
    UnknownResourceType {
        api_version: String,
        kind: String,
        reason: String,
    },

    #[error("failed to list source resources: {0}")]
    ListFailure(String),

    #[error("failed to register {failed} of {total} services")]
    CreateFailure { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, HeraldError>;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote cluster liveness probing.

use crate::constants::CONNECTION_CONDITION_TYPE;
use crate::types::service_class::ServiceClassCondition;
use kube::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Connecting,
    Offline,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Offline => write!(f, "Offline"),
        }
    }
}

/// Outcome of a liveness probe against the remote cluster. Probing never
/// fails hard; every outcome is returned as data so the reconciler can
/// record it before deciding whether to abort the pass.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub reason: String,
    pub message: String,
}

impl ConnectionStatus {
    pub fn connected(message: String) -> Self {
        ConnectionStatus {
            state: ConnectionState::Connected,
            reason: "ClusterReachable".to_string(),
            message,
        }
    }

    pub fn offline(reason: &str, message: String) -> Self {
        ConnectionStatus {
            state: ConnectionState::Offline,
            reason: reason.to_string(),
            message,
        }
    }

    /// Render as a status condition for the owning ServiceClass
    pub fn to_condition(&self) -> ServiceClassCondition {
        ServiceClassCondition {
            condition_type: CONNECTION_CONDITION_TYPE.to_string(),
            status: self.state.to_string(),
            reason: self.reason.clone(),
            message: self.message.clone(),
            last_transition_time: Some(k8s_openapi::chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// Probe the remote cluster by asking the API server for its version.
/// Network errors, auth errors and timeouts all fold into `Offline` with
/// distinct messages.
#[instrument(skip(config))]
pub async fn test_connection(config: &kube::Config, timeout: Duration) -> ConnectionStatus {
    let client = match Client::try_from(config.clone()) {
        Ok(client) => client,
        Err(e) => {
            return ConnectionStatus::offline(
                "ClientConstructionFailed",
                format!("failed to construct probe client: {}", e),
            )
        }
    };

    match tokio::time::timeout(timeout, client.apiserver_version()).await {
        Ok(Ok(version)) => {
            debug!("Remote API server answered with version {}", version.git_version);
            ConnectionStatus::connected(format!(
                "remote API server {} is reachable",
                version.git_version
            ))
        }
        Ok(Err(e)) => ConnectionStatus::offline(
            "ClusterUnreachable",
            format!("remote API server is unreachable: {}", e),
        ),
        Err(_) => ConnectionStatus::offline(
            "ProbeTimeout",
            format!("connection probe timed out after {}s", timeout.as_secs()),
        ),
    }
}

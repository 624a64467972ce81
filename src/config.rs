// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Requeue interval in seconds after a failed reconciliation pass
    pub requeue_interval_secs: u64,
    /// Timeout in seconds for the remote cluster liveness probe
    pub connect_timeout_secs: u64,
    /// Listen address for the admission webhook server
    pub webhook_addr: String,
    pub testing_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let requeue_interval_secs = env::var("REQUEUE_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("REQUEUE_INTERVAL_SECS is not a valid number")?;
        let connect_timeout_secs = env::var("CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("CONNECT_TIMEOUT_SECS is not a valid number")?;
        let webhook_addr =
            env::var("WEBHOOK_ADDR").unwrap_or_else(|_| "0.0.0.0:8443".to_string());
        // For testing, uses the local cluster as the registration target instead of
        // building a client from the bootstrap secret
        let testing_mode: bool = env::var("TESTING_MODE")
            .unwrap_or("false".to_string())
            .parse()
            .unwrap_or(false);

        Ok(Config {
            requeue_interval_secs,
            connect_timeout_secs,
            webhook_addr,
            testing_mode,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            requeue_interval_secs: 60,
            connect_timeout_secs: 10,
            webhook_addr: "0.0.0.0:8443".to_string(),
            testing_mode: false,
        }
    }
}

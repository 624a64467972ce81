// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bootstrap secret handling and remote cluster client creation.

use crate::constants::bootstrap;
use crate::error::{HeraldError, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{config::KubeConfigOptions, config::Kubeconfig, Api, Client};
use tracing::{debug, info, instrument};

/// Connection material extracted from the bootstrap secret: a parsed client
/// configuration for the control-plane cluster plus the namespace herald
/// registers services into.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub config: kube::Config,
    pub namespace: String,
}

/// Fetch and validate the bootstrap secret from the given namespace. The
/// secret is owned by an external provisioning process and must carry both
/// the `kubeconfig` and `namespace` keys.
#[instrument(skip(client))]
pub async fn fetch_bootstrap(client: &Client, namespace: &str) -> Result<Bootstrap> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    info!(
        "Fetching bootstrap secret '{}/{}'...",
        namespace,
        bootstrap::SECRET_NAME
    );

    let secret = secrets.get(bootstrap::SECRET_NAME).await.map_err(|e| {
        HeraldError::MalformedBootstrap(format!(
            "secret '{}/{}' is unavailable: {}",
            namespace,
            bootstrap::SECRET_NAME,
            e
        ))
    })?;

    let Some(data) = secret.data.as_ref() else {
        return Err(HeraldError::MalformedBootstrap(format!(
            "secret '{}/{}' has no data",
            namespace,
            bootstrap::SECRET_NAME
        )));
    };

    let Some(kubeconfig) = data.get(bootstrap::KUBECONFIG_KEY) else {
        return Err(HeraldError::MalformedBootstrap(format!(
            "secret '{}/{}' does not contain the '{}' key",
            namespace,
            bootstrap::SECRET_NAME,
            bootstrap::KUBECONFIG_KEY
        )));
    };

    let Some(target_namespace) = data.get(bootstrap::NAMESPACE_KEY) else {
        return Err(HeraldError::MalformedBootstrap(format!(
            "secret '{}/{}' does not contain the '{}' key",
            namespace,
            bootstrap::SECRET_NAME,
            bootstrap::NAMESPACE_KEY
        )));
    };

    let target_namespace = String::from_utf8(target_namespace.0.clone()).map_err(|e| {
        HeraldError::MalformedBootstrap(format!("'{}' key is not UTF-8: {}", bootstrap::NAMESPACE_KEY, e))
    })?;

    let config = config_from_kubeconfig(&kubeconfig.0).await?;
    debug!("Bootstrap points at remote cluster {}", config.cluster_url);

    Ok(Bootstrap {
        config,
        namespace: target_namespace,
    })
}

/// Parse a raw kubeconfig into a client configuration
async fn config_from_kubeconfig(raw: &[u8]) -> Result<kube::Config> {
    let parsed: Kubeconfig = serde_yaml::from_slice(raw)
        .map_err(|e| HeraldError::MalformedBootstrap(format!("failed to parse kubeconfig: {}", e)))?;

    kube::Config::from_custom_kubeconfig(parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            HeraldError::MalformedBootstrap(format!("failed to build client config: {}", e))
        })
}

/// Create a client for the control-plane cluster from validated bootstrap
/// material. A fresh client is built on every pass; no connection state is
/// carried across reconciliations.
pub fn create_remote_client(bootstrap: &Bootstrap) -> Result<Client> {
    Client::try_from(bootstrap.config.clone()).map_err(|e| {
        HeraldError::MalformedBootstrap(format!("failed to create remote client: {}", e))
    })
}

/// Create a client for testing mode, targeting the local cluster instead of
/// the one named by the bootstrap secret
pub async fn create_testing_client() -> Result<Client> {
    let config = kube::Config::infer().await.map_err(|e| {
        HeraldError::MalformedBootstrap(format!("failed to infer local config: {}", e))
    })?;

    Client::try_from(config).map_err(|e| {
        HeraldError::MalformedBootstrap(format!("failed to create testing client: {}", e))
    })
}

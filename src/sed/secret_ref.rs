// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret-backed attribute resolution.

use crate::error::{HeraldError, Result};
use crate::sed::path::AttributePath;
use crate::types::service_class::SecretRefFieldMapping;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

/// A compiled secret-ref mapping. The secret name and key expressions are
/// evaluated against the *source* document; the resulting pair is then
/// resolved against a Secret in the given namespace.
#[derive(Debug)]
pub struct SecretRefMapping {
    name: String,
    secret_name: AttributePath,
    secret_key: AttributePath,
}

impl SecretRefMapping {
    pub fn new(mapping: &SecretRefFieldMapping) -> Result<Self> {
        Ok(SecretRefMapping {
            name: mapping.name.clone(),
            secret_name: AttributePath::parse(&mapping.secret_name)?,
            secret_key: AttributePath::parse(&mapping.secret_key)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the mapping for one source document. Performs exactly one
    /// secret read per call; results are not cached.
    pub async fn resolve(
        &self,
        client: &Client,
        namespace: &str,
        document: &Value,
    ) -> Result<String> {
        let secret_name = self.secret_name.extract(document)?;
        let secret_key = self.secret_key.extract(document)?;

        debug!(
            "Resolving secret ref '{}' via {}/{}:{}",
            self.name, namespace, secret_name, secret_key
        );

        let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
        let secret = secrets.get(&secret_name).await?;

        let value = secret
            .data
            .as_ref()
            .and_then(|data| data.get(&secret_key))
            .ok_or_else(|| HeraldError::SecretKeyNotFound {
                namespace: namespace.to_string(),
                secret: secret_name.clone(),
                key: secret_key.clone(),
            })?;

        String::from_utf8(value.0.clone()).map_err(|_| HeraldError::SecretKeyNotFound {
            namespace: namespace.to_string(),
            secret: secret_name,
            key: secret_key,
        })
    }
}

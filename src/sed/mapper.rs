// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Applies a ServiceClass mapping set to one source resource.

use crate::error::Result;
use crate::sed::path::AttributePath;
use crate::sed::secret_ref::SecretRefMapping;
use crate::types::registered_service::ServiceEndpointDefinitionItem;
use crate::types::service_class::ServiceEndpointDefinitionMappings;
use kube::Client;
use serde_json::Value;

/// A compiled mapping set. Construction validates every path expression up
/// front, so a bad ServiceClass fails before any resource is touched.
pub struct ServiceDescriptorMapper {
    client: Client,
    namespace: String,
    resource_fields: Vec<(String, AttributePath)>,
    secret_refs: Vec<SecretRefMapping>,
}

impl ServiceDescriptorMapper {
    pub fn new(
        client: Client,
        namespace: &str,
        mappings: &ServiceEndpointDefinitionMappings,
    ) -> Result<Self> {
        let resource_fields = mappings
            .resource_fields
            .iter()
            .map(|m| Ok((m.name.clone(), AttributePath::parse(&m.json_path)?)))
            .collect::<Result<Vec<_>>>()?;

        let secret_refs = mappings
            .secret_ref_fields
            .iter()
            .map(SecretRefMapping::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(ServiceDescriptorMapper {
            client,
            namespace: namespace.to_string(),
            resource_fields,
            secret_refs,
        })
    }

    /// Map one source document into its endpoint definition items. The first
    /// failing mapping aborts the whole call; callers isolate the failure to
    /// the offending resource. Output is sorted by mapping name so repeated
    /// runs over the same document are byte-identical.
    pub async fn map(&self, document: &Value) -> Result<Vec<ServiceEndpointDefinitionItem>> {
        let mut items = Vec::with_capacity(self.resource_fields.len() + self.secret_refs.len());

        for (name, path) in &self.resource_fields {
            items.push(ServiceEndpointDefinitionItem {
                name: name.clone(),
                value: path.extract(document)?,
                in_secret: false,
            });
        }

        for secret_ref in &self.secret_refs {
            let value = secret_ref
                .resolve(&self.client, &self.namespace, document)
                .await?;
            items.push(ServiceEndpointDefinitionItem {
                name: secret_ref.name().to_string(),
                value,
                in_secret: true,
            });
        }

        items.sort();
        Ok(items)
    }
}

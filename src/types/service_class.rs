// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A ServiceClass describes how to discover one kind of service resource in
/// this cluster and how to map each instance into a RegisteredService in the
/// control-plane cluster.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "herald.dev", version = "v1alpha1", kind = "ServiceClass")]
#[kube(namespaced)]
#[kube(status = "ServiceClassStatus")]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassSpec {
    /// The resource type this class discovers and its attribute mappings
    pub resource: ServiceClassResource,
    /// Attributes identifying the class of registered services
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_class_identity: Vec<ServiceClassIdentityItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<EnvironmentConstraints>,
}

/// The source resource type targeted by a ServiceClass. Kind, apiVersion and
/// the mapping set are immutable after creation (admission-enforced).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassResource {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub service_endpoint_definition_mappings: ServiceEndpointDefinitionMappings,
}

impl ServiceClassResource {
    /// Split the declared apiVersion into (group, version). Core resources
    /// carry no group segment.
    pub fn group_version(&self) -> (String, String) {
        match self.api_version.split_once('/') {
            Some((group, version)) => (group.to_string(), version.to_string()),
            None => (String::new(), self.api_version.clone()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpointDefinitionMappings {
    /// Attributes read directly from the source resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_fields: Vec<ResourceFieldMapping>,
    /// Attributes resolved through a secret referenced by the source resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secret_ref_fields: Vec<SecretRefFieldMapping>,
}

impl ServiceEndpointDefinitionMappings {
    /// Mapping names in declaration order, resource fields first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resource_fields
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.secret_ref_fields.iter().map(|m| m.name.as_str()))
    }
}

/// A mapping evaluated directly against the source resource
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFieldMapping {
    pub name: String,
    pub json_path: String,
}

/// A mapping whose secret name and key are extracted from the source
/// resource, then resolved against a Secret in the same namespace
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct SecretRefFieldMapping {
    pub name: String,
    /// Path expression yielding the secret name
    pub secret_name: String,
    /// Path expression yielding the key within the secret
    pub secret_key: String,
}

/// An attribute that is necessary to identify a service class
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassIdentityItem {
    pub name: String,
    pub value: String,
}

/// Metadata that can be used to check the health of a service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub container: HealthCheckContainer,
}

/// Container image and command used to run a health check against the
/// service endpoint definition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckContainer {
    pub image: String,
    pub command: String,
}

/// Restricts the environments a registered service may be bound from
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConstraints {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassStatus {
    /// Running history of connection conditions, one appended per pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ServiceClassCondition>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

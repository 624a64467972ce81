// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::types::service_class::{
    EnvironmentConstraints, HealthCheck, ServiceClassIdentityItem,
};

/// Canonical, cluster-portable description of one discovered service
/// instance. Written by herald into the control-plane cluster.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "herald.dev", version = "v1alpha1", kind = "RegisteredService")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredServiceSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_class_identity: Vec<ServiceClassIdentityItem>,
    /// Named attributes describing how to reach the service
    pub service_endpoint_definition: Vec<ServiceEndpointDefinitionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<EnvironmentConstraints>,
}

/// One named attribute of a service endpoint definition. `in_secret` marks
/// values that were resolved from a secret so downstream consumers can apply
/// redaction policy.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpointDefinitionItem {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub in_secret: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_secret_omitted_when_false() {
        let item = ServiceEndpointDefinitionItem {
            name: "host".to_string(),
            value: "db.example.com".to_string(),
            in_secret: false,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("inSecret").is_none());
    }

    #[test]
    fn test_in_secret_serialized_when_true() {
        let item = ServiceEndpointDefinitionItem {
            name: "password".to_string(),
            value: "hunter2".to_string(),
            in_secret: true,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["inSecret"], true);
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One registration pass: fold the listed source resources into
//! RegisteredService objects in the remote cluster, isolating failures per
//! resource.

use crate::constants::OPERATOR_NAME;
use crate::error::{HeraldError, Result};
use crate::sed::ServiceDescriptorMapper;
use crate::types::registered_service::{RegisteredService, RegisteredServiceSpec};
use crate::types::service_class::ServiceClass;
use kube::{
    api::{DynamicObject, Patch, PatchParams},
    Api, Client, ResourceExt,
};
use tracing::{info, instrument, warn};

/// Outcome for one source resource within a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Applied into the remote cluster under the given target name
    Registered { target: String },
    /// Mapping failed; only this resource is skipped
    SkippedMapping { reason: String },
    /// Mapping succeeded but the remote apply failed
    ApplyFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct ItemResult {
    pub source: String,
    pub outcome: ItemOutcome,
}

/// Per-item results of a registration pass. Mapping failures are isolated;
/// apply failures make the whole pass count as failed (and requeue-worthy)
/// without blocking the remaining resources.
#[derive(Debug, Default)]
pub struct PassSummary {
    pub results: Vec<ItemResult>,
}

impl PassSummary {
    pub fn registered(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Registered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::SkippedMapping { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::ApplyFailed { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Collapse into the pass-level verdict
    pub fn into_result(self) -> Result<PassSummary> {
        if self.failed() > 0 {
            return Err(HeraldError::CreateFailure {
                failed: self.failed(),
                total: self.results.len(),
            });
        }
        Ok(self)
    }
}

/// Deterministic target name for a source resource. Keyed by kind and name:
/// admission allows only one ServiceClass per (kind, apiVersion) in a
/// namespace, so the pair cannot collide across classes.
pub fn registered_service_name(kind: &str, source_name: &str) -> String {
    format!("{}-{}", kind.to_lowercase(), source_name)
}

/// Map every source resource and apply the results into the remote
/// namespace. Never returns early: each resource gets an independent
/// outcome.
#[instrument(skip_all, fields(class = %service_class.name_any(), remote_namespace))]
pub async fn register_services(
    mapper: &ServiceDescriptorMapper,
    service_class: &ServiceClass,
    sources: &[DynamicObject],
    remote_client: &Client,
    remote_namespace: &str,
) -> PassSummary {
    let registry: Api<RegisteredService> = Api::namespaced(remote_client.clone(), remote_namespace);
    let mut summary = PassSummary::default();

    for source in sources {
        let source_name = source.name_any();
        let outcome =
            register_one(mapper, service_class, source, &registry, remote_namespace).await;

        match &outcome {
            ItemOutcome::Registered { target } => {
                info!("Registered service '{}' as '{}'", source_name, target);
            }
            ItemOutcome::SkippedMapping { reason } => {
                warn!("Skipping service '{}': {}", source_name, reason);
            }
            ItemOutcome::ApplyFailed { reason } => {
                warn!("Failed to register service '{}': {}", source_name, reason);
            }
        }

        summary.results.push(ItemResult {
            source: source_name,
            outcome,
        });
    }

    summary
}

async fn register_one(
    mapper: &ServiceDescriptorMapper,
    service_class: &ServiceClass,
    source: &DynamicObject,
    registry: &Api<RegisteredService>,
    remote_namespace: &str,
) -> ItemOutcome {
    let document = match serde_json::to_value(source) {
        Ok(document) => document,
        Err(e) => {
            return ItemOutcome::SkippedMapping {
                reason: format!("source resource is not serializable: {}", e),
            }
        }
    };

    let items = match mapper.map(&document).await {
        Ok(items) => items,
        Err(e) => {
            return ItemOutcome::SkippedMapping {
                reason: e.to_string(),
            }
        }
    };

    let target = registered_service_name(&service_class.spec.resource.kind, &source.name_any());
    let mut registered = RegisteredService::new(
        &target,
        RegisteredServiceSpec {
            service_class_identity: service_class.spec.service_class_identity.clone(),
            service_endpoint_definition: items,
            health_check: service_class.spec.health_check.clone(),
            constraints: service_class.spec.constraints.clone(),
        },
    );
    registered.metadata.namespace = Some(remote_namespace.to_string());

    // Server-side apply so repeated passes converge instead of failing on
    // already-existing targets
    let pp = PatchParams::apply(OPERATOR_NAME).force();
    match registry.patch(&target, &pp, &Patch::Apply(&registered)).await {
        Ok(_) => ItemOutcome::Registered { target },
        Err(e) => ItemOutcome::ApplyFailed {
            reason: e.to_string(),
        },
    }
}

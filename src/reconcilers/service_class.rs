// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ServiceClass reconciler - discovers source resources and registers them
//! in the control-plane cluster.

use crate::config::Config;
use crate::error::{HeraldError, Result};
use crate::kubernetes::{
    create_remote_client, create_testing_client, fetch_bootstrap, test_connection,
    ConnectionState,
};
use crate::registration::register_services;
use crate::sed::ServiceDescriptorMapper;
use crate::types::service_class::{ServiceClass, ServiceClassCondition};
use futures::StreamExt;
use kube::{
    api::{DynamicObject, ListParams, Patch, PatchParams},
    core::GroupVersionKind,
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct ServiceClassReconciler {
    client: Client,
    config: Config,
}

impl ServiceClassReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let classes: Api<ServiceClass> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(classes, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled service class: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(class: Arc<ServiceClass>, ctx: Arc<ServiceClassReconciler>) -> Result<Action> {
    let namespace = class.namespace().unwrap_or_default();
    let name = class.name_any();

    info!("Reconciling service class {}/{}", namespace, name);

    // Resolve the declared (kind, apiVersion) to a listable resource. A
    // failure here is a static misconfiguration: log and stop, no requeue.
    let (group, version) = class.spec.resource.group_version();
    let gvk = GroupVersionKind::gvk(&group, &version, &class.spec.resource.kind);
    let (ar, _caps) = match kube::discovery::pinned_kind(&ctx.client, &gvk).await {
        Ok(pinned) => pinned,
        Err(e) => {
            let err = HeraldError::UnknownResourceType {
                api_version: class.spec.resource.api_version.clone(),
                kind: class.spec.resource.kind.clone(),
                reason: e.to_string(),
            };
            error!("Failed to resolve resource type for {}/{}: {}", namespace, name, err);
            return Ok(Action::await_change());
        }
    };

    let sources: Api<DynamicObject> = Api::namespaced_with(ctx.client.clone(), &namespace, &ar);
    let sources = match sources.list(&ListParams::default()).await {
        Ok(list) => list.items,
        Err(e) => {
            error!(
                "Failed to list {} resources in {}: {}",
                class.spec.resource.kind,
                namespace,
                HeraldError::ListFailure(e.to_string())
            );
            return Ok(Action::await_change());
        }
    };

    // Admission rejects invalid path expressions, so a compile failure here
    // means the object bypassed the webhook. Misconfiguration, no requeue.
    let mapper = match ServiceDescriptorMapper::new(
        ctx.client.clone(),
        &namespace,
        &class.spec.resource.service_endpoint_definition_mappings,
    ) {
        Ok(mapper) => mapper,
        Err(e) => {
            error!("Invalid mapping set on {}/{}: {}", namespace, name, e);
            return Ok(Action::await_change());
        }
    };

    // The bootstrap secret may not be provisioned yet; failing here requeues.
    let bootstrap = fetch_bootstrap(&ctx.client, &namespace).await?;

    let status = test_connection(
        &bootstrap.config,
        Duration::from_secs(ctx.config.connect_timeout_secs),
    )
    .await;

    let mut conditions = class
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default();
    conditions.push(status.to_condition());

    if status.state == ConnectionState::Offline {
        // The offline verdict wins over a failed status write; both requeue.
        if let Err(e) = persist_conditions(&ctx.client, &namespace, &name, &conditions).await {
            error!("Failed to persist status for {}/{}: {}", namespace, name, e);
        }
        return Err(HeraldError::ConnectivityOffline(status.message));
    }

    let remote_client = if ctx.config.testing_mode {
        create_testing_client().await?
    } else {
        create_remote_client(&bootstrap)?
    };

    let summary =
        register_services(&mapper, &class, &sources, &remote_client, &bootstrap.namespace).await;

    info!(
        "Pass for {}/{} finished: {} registered, {} skipped, {} failed",
        namespace,
        name,
        summary.registered(),
        summary.skipped(),
        summary.failed()
    );

    // A lost condition write fails the pass so it is retried, not dropped.
    persist_conditions(&ctx.client, &namespace, &name, &conditions).await?;

    summary.into_result()?;
    Ok(Action::await_change())
}

/// Append-only persistence of the connection condition history.
async fn persist_conditions(
    client: &Client,
    namespace: &str,
    name: &str,
    conditions: &[ServiceClassCondition],
) -> Result<()> {
    let classes: Api<ServiceClass> = Api::namespaced(client.clone(), namespace);
    let patch = json!({"status": {"conditions": conditions}});

    classes
        .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    Ok(())
}

fn error_policy(
    class: Arc<ServiceClass>,
    error: &HeraldError,
    ctx: Arc<ServiceClassReconciler>,
) -> Action {
    error!(
        "Reconciliation of {} failed: {}",
        class.name_any(),
        error
    );
    Action::requeue(Duration::from_secs(ctx.config.requeue_interval_secs))
}

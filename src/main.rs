// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};

use herald::admission::{admission_router, AdmissionState};
use herald::config::Config;
use herald::kubernetes::wait_for_service_class_crd;
use herald::reconcilers::ServiceClassReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Herald operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: webhook_addr={}, requeue_interval={}s",
        config.webhook_addr, config.requeue_interval_secs
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Wait for the ServiceClass CRD before starting the reconciler
    info!("Waiting for ServiceClass CRD to become available...");
    wait_for_service_class_crd(&client).await?;

    let reconciler = ServiceClassReconciler::new(client.clone(), config.clone());

    info!("Starting reconciler and admission webhook...");

    // Run the reconciler and the admission webhook concurrently
    tokio::try_join!(
        reconciler.run(),
        serve_admission(client.clone(), config.webhook_addr.clone())
    )?;

    // This should never be reached as both run forever
    warn!("All controllers stopped unexpectedly");
    Ok(())
}

async fn serve_admission(client: Client, addr: String) -> Result<()> {
    let router = admission_router(AdmissionState::new(client));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Admission webhook listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

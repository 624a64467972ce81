// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery, bootstrap handling and remote
//! cluster clients.

pub mod client;
pub mod connection;
pub mod crd;

pub use client::{create_remote_client, create_testing_client, fetch_bootstrap, Bootstrap};
pub use connection::{test_connection, ConnectionState, ConnectionStatus};
pub use crd::wait_for_service_class_crd;

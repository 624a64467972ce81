// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registration of discovered services into the control-plane cluster.

pub mod pass;

pub use pass::{register_services, registered_service_name, ItemOutcome, ItemResult, PassSummary};

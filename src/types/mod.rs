// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD types owned by the herald operator.

pub mod registered_service;
pub mod service_class;

pub use registered_service::{RegisteredService, ServiceEndpointDefinitionItem};
pub use service_class::ServiceClass;

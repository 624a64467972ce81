// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service endpoint definition mapping: path extraction, secret reference
//! resolution, and per-resource descriptor mapping.

pub mod mapper;
pub mod path;
pub mod secret_ref;

pub use mapper::ServiceDescriptorMapper;
pub use path::AttributePath;
pub use secret_ref::SecretRefMapping;

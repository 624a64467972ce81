// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Admission-time invariant enforcement for ServiceClass objects.

pub mod server;
pub mod validator;

pub use server::{admission_router, AdmissionState};
pub use validator::{
    as_service_class, validate_create, validate_delete, validate_update, ValidationErrors,
    Violation, ViolationKind,
};

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pure validation rules for ServiceClass admission. Every violation found
//! in a request is collected and reported together; nothing short-circuits.

use crate::sed::AttributePath;
use crate::types::service_class::ServiceClass;
use kube::api::DynamicObject;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    InvalidPathSyntax,
    DuplicateMappingName,
    DuplicateResourceType,
    ImmutableKind,
    ImmutableApiVersion,
    ImmutableMappingSet,
    NotAServiceClass,
}

/// One admission violation, located by the field path it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered aggregate of every violation found in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<Violation>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

fn finish(violations: Vec<Violation>) -> Result<(), ValidationErrors> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

/// Type guard: reject any request payload that is not a ServiceClass
pub fn as_service_class(object: &DynamicObject) -> Result<ServiceClass, ValidationErrors> {
    let not_a_service_class = |message: String| {
        ValidationErrors(vec![Violation {
            field: "kind".to_string(),
            kind: ViolationKind::NotAServiceClass,
            message,
        }])
    };

    if let Some(types) = &object.types {
        if types.kind != "ServiceClass" {
            return Err(not_a_service_class(format!(
                "expected a ServiceClass, got {}",
                types.kind
            )));
        }
    }

    let value = serde_json::to_value(object)
        .map_err(|e| not_a_service_class(format!("object is not serializable: {}", e)))?;
    serde_json::from_value(value)
        .map_err(|e| not_a_service_class(format!("object is not a valid ServiceClass: {}", e)))
}

/// Create-time invariants: path syntax, mapping-name uniqueness, and
/// one-class-per-resource-type within the namespace.
pub fn validate_create(
    object: &ServiceClass,
    siblings: &[ServiceClass],
) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();
    check_mapping_paths(object, &mut violations);
    check_duplicate_names(object, &mut violations);
    check_duplicate_resource_type(object, siblings, &mut violations);
    finish(violations)
}

/// Update-time invariants: kind, apiVersion and the mapping set are all
/// immutable; the resource-type uniqueness rule is re-checked so an object
/// that slipped past creation is still rejected on every update.
pub fn validate_update(
    old: &ServiceClass,
    new: &ServiceClass,
    siblings: &[ServiceClass],
) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    if old.spec.resource.kind != new.spec.resource.kind {
        violations.push(Violation {
            field: "spec.resource.kind".to_string(),
            kind: ViolationKind::ImmutableKind,
            message: format!("kind is immutable (was '{}')", old.spec.resource.kind),
        });
    }

    if old.spec.resource.api_version != new.spec.resource.api_version {
        violations.push(Violation {
            field: "spec.resource.apiVersion".to_string(),
            kind: ViolationKind::ImmutableApiVersion,
            message: format!(
                "apiVersion is immutable (was '{}')",
                old.spec.resource.api_version
            ),
        });
    }

    if !mapping_sets_equal(old, new) {
        violations.push(Violation {
            field: "spec.resource.serviceEndpointDefinitionMappings".to_string(),
            kind: ViolationKind::ImmutableMappingSet,
            message: "the service endpoint definition mapping set is immutable".to_string(),
        });
    }

    check_duplicate_resource_type(new, siblings, &mut violations);
    finish(violations)
}

/// Delete requests are always allowed
pub fn validate_delete(_object: &ServiceClass) -> Result<(), ValidationErrors> {
    Ok(())
}

/// Set equality over both mapping lists; ordering differences are not a
/// change.
fn mapping_sets_equal(old: &ServiceClass, new: &ServiceClass) -> bool {
    let old_mappings = &old.spec.resource.service_endpoint_definition_mappings;
    let new_mappings = &new.spec.resource.service_endpoint_definition_mappings;

    old_mappings.resource_fields.iter().collect::<BTreeSet<_>>()
        == new_mappings.resource_fields.iter().collect::<BTreeSet<_>>()
        && old_mappings.secret_ref_fields.iter().collect::<BTreeSet<_>>()
            == new_mappings.secret_ref_fields.iter().collect::<BTreeSet<_>>()
}

fn check_mapping_paths(object: &ServiceClass, violations: &mut Vec<Violation>) {
    let mappings = &object.spec.resource.service_endpoint_definition_mappings;

    for (i, mapping) in mappings.resource_fields.iter().enumerate() {
        if let Err(e) = AttributePath::parse(&mapping.json_path) {
            violations.push(Violation {
                field: format!(
                    "spec.resource.serviceEndpointDefinitionMappings.resourceFields[{i}].jsonPath"
                ),
                kind: ViolationKind::InvalidPathSyntax,
                message: e.to_string(),
            });
        }
    }

    for (i, mapping) in mappings.secret_ref_fields.iter().enumerate() {
        if let Err(e) = AttributePath::parse(&mapping.secret_name) {
            violations.push(Violation {
                field: format!(
                    "spec.resource.serviceEndpointDefinitionMappings.secretRefFields[{i}].secretName"
                ),
                kind: ViolationKind::InvalidPathSyntax,
                message: e.to_string(),
            });
        }
        if let Err(e) = AttributePath::parse(&mapping.secret_key) {
            violations.push(Violation {
                field: format!(
                    "spec.resource.serviceEndpointDefinitionMappings.secretRefFields[{i}].secretKey"
                ),
                kind: ViolationKind::InvalidPathSyntax,
                message: e.to_string(),
            });
        }
    }
}

fn check_duplicate_names(object: &ServiceClass, violations: &mut Vec<Violation>) {
    let mappings = &object.spec.resource.service_endpoint_definition_mappings;
    let mut seen = HashSet::new();

    for (i, name) in mappings.names().enumerate() {
        if !seen.insert(name) {
            violations.push(Violation {
                field: format!("spec.resource.serviceEndpointDefinitionMappings[{i}].name"),
                kind: ViolationKind::DuplicateMappingName,
                message: format!("duplicate mapping name '{}'", name),
            });
        }
    }
}

fn check_duplicate_resource_type(
    object: &ServiceClass,
    siblings: &[ServiceClass],
    violations: &mut Vec<Violation>,
) {
    let own_name = object.metadata.name.as_deref().unwrap_or_default();

    for sibling in siblings {
        let sibling_name = sibling.metadata.name.as_deref().unwrap_or_default();
        if sibling_name == own_name {
            continue;
        }
        if sibling.spec.resource.kind == object.spec.resource.kind
            && sibling.spec.resource.api_version == object.spec.resource.api_version
        {
            violations.push(Violation {
                field: "spec.resource".to_string(),
                kind: ViolationKind::DuplicateResourceType,
                message: format!(
                    "service class '{}' already manages resources of type {}.{}",
                    sibling_name, object.spec.resource.kind, object.spec.resource.api_version
                ),
            });
        }
    }
}

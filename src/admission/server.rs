// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Admission webhook endpoint. TLS is terminated in front of the operator;
//! this serves plain HTTP.

use crate::admission::validator::{
    as_service_class, validate_create, validate_delete, validate_update,
};
use crate::types::service_class::ServiceClass;
use axum::{extract::State, routing::post, Json, Router};
use kube::api::ListParams;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use kube::core::DynamicObject;
use kube::{Api, Client};
use tracing::{debug, warn};

/// Shared state for the admission handlers
#[derive(Clone)]
pub struct AdmissionState {
    client: Client,
}

impl AdmissionState {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Create the admission router
///
/// Currently supports:
/// - POST /validate - validate ServiceClass create/update/delete requests
pub fn admission_router(state: AdmissionState) -> Router {
    Router::new()
        .route("/validate", post(validate_handler))
        .with_state(state)
}

async fn validate_handler(
    State(state): State<AdmissionState>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed admission review: {}", e);
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    let response = AdmissionResponse::from(&request);
    let response = match review_request(&state.client, &request).await {
        Ok(()) => {
            debug!(
                "Allowing {:?} of {}/{}",
                request.operation,
                request.namespace.as_deref().unwrap_or_default(),
                request.name
            );
            response
        }
        Err(reason) => {
            warn!(
                "Denying {:?} of {}/{}: {}",
                request.operation,
                request.namespace.as_deref().unwrap_or_default(),
                request.name,
                reason
            );
            response.deny(reason)
        }
    };

    Json(response.into_review())
}

async fn review_request(
    client: &Client,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<(), String> {
    match request.operation {
        Operation::Create => {
            let object = required_object(request.object.as_ref())?;
            let siblings = list_siblings(client, request).await?;
            validate_create(&object, &siblings).map_err(|e| e.to_string())
        }
        Operation::Update => {
            let old = required_object(request.old_object.as_ref())?;
            let new = required_object(request.object.as_ref())?;
            let siblings = list_siblings(client, request).await?;
            validate_update(&old, &new, &siblings).map_err(|e| e.to_string())
        }
        Operation::Delete => {
            let object = required_object(request.old_object.as_ref())?;
            validate_delete(&object).map_err(|e| e.to_string())
        }
        Operation::Connect => Ok(()),
    }
}

fn required_object(object: Option<&DynamicObject>) -> Result<ServiceClass, String> {
    let object = object.ok_or_else(|| "request carries no object".to_string())?;
    as_service_class(object).map_err(|e| e.to_string())
}

/// One read-only snapshot of sibling ServiceClasses per request
async fn list_siblings(
    client: &Client,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<Vec<ServiceClass>, String> {
    let namespace = request.namespace.as_deref().unwrap_or_default();
    let classes: Api<ServiceClass> = Api::namespaced(client.clone(), namespace);

    classes
        .list(&ListParams::default())
        .await
        .map(|list| list.items)
        .map_err(|e| format!("failed to list sibling service classes: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{service_class_list_json, MockService};
    use http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SIBLINGS_PATH: &str = "/apis/herald.dev/v1alpha1/namespaces/eggs/serviceclasses";

    fn service_class_object(name: &str, kind: &str, json_path: &str) -> Value {
        json!({
            "apiVersion": "herald.dev/v1alpha1",
            "kind": "ServiceClass",
            "metadata": {"name": name, "namespace": "eggs"},
            "spec": {
                "resource": {
                    "apiVersion": "foo.bar/v1",
                    "kind": kind,
                    "serviceEndpointDefinitionMappings": {
                        "resourceFields": [{"name": "x", "jsonPath": json_path}]
                    }
                }
            }
        })
    }

    fn admission_review(operation: &str, object: Value, old_object: Value) -> Value {
        json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": {"group": "herald.dev", "version": "v1alpha1", "kind": "ServiceClass"},
                "resource": {"group": "herald.dev", "version": "v1alpha1", "resource": "serviceclasses"},
                "requestKind": {"group": "herald.dev", "version": "v1alpha1", "kind": "ServiceClass"},
                "requestResource": {"group": "herald.dev", "version": "v1alpha1", "resource": "serviceclasses"},
                "name": "spam",
                "namespace": "eggs",
                "operation": operation,
                "userInfo": {"username": "admin"},
                "object": object,
                "oldObject": old_object,
                "dryRun": false
            }
        })
    }

    async fn post_review(router: Router, review: Value) -> Value {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/validate")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(review.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_with_valid_mapping_is_allowed() {
        let client = MockService::new()
            .on_get(SIBLINGS_PATH, 200, &service_class_list_json(&[]))
            .into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "CREATE",
            service_class_object("spam", "baz", ".spec.host"),
            Value::Null,
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], true);
    }

    #[tokio::test]
    async fn test_create_with_invalid_mapping_is_denied() {
        let client = MockService::new()
            .on_get(SIBLINGS_PATH, 200, &service_class_list_json(&[]))
            .into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "CREATE",
            service_class_object("spam", "baz", ".invalid[*"),
            Value::Null,
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], false);
        let message = reply["response"]["status"]["message"].as_str().unwrap();
        assert!(message.contains("jsonPath"));
    }

    #[tokio::test]
    async fn test_create_duplicate_resource_type_is_denied() {
        let sibling = service_class_object("beans", "baz", ".spec.host");
        let client = MockService::new()
            .on_get(SIBLINGS_PATH, 200, &service_class_list_json(&[sibling]))
            .into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "CREATE",
            service_class_object("spam", "baz", ".spec.host"),
            Value::Null,
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], false);
        let message = reply["response"]["status"]["message"].as_str().unwrap();
        assert!(message.contains("'beans'"));
    }

    #[tokio::test]
    async fn test_update_kind_change_is_denied() {
        let client = MockService::new()
            .on_get(SIBLINGS_PATH, 200, &service_class_list_json(&[]))
            .into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "UPDATE",
            service_class_object("spam", "bam", ".spec.host"),
            service_class_object("spam", "baz", ".spec.host"),
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], false);
        let message = reply["response"]["status"]["message"].as_str().unwrap();
        assert!(message.contains("kind is immutable"));
    }

    #[tokio::test]
    async fn test_delete_is_allowed() {
        let client = MockService::new().into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "DELETE",
            Value::Null,
            service_class_object("spam", "baz", ".spec.host"),
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], true);
    }

    #[tokio::test]
    async fn test_delete_of_non_service_class_is_denied() {
        let client = MockService::new().into_client();
        let router = admission_router(AdmissionState::new(client));

        let review = admission_review(
            "DELETE",
            Value::Null,
            json!({"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "spam"}}),
        );
        let reply = post_review(router, review).await;

        assert_eq!(reply["response"]["allowed"], false);
    }
}

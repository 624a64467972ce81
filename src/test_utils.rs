// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of every (method, path) issued through this service so far.
    /// Clone the service before `into_client` to keep a handle for inspection.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(
                (method.to_string(), path.to_string()),
                (status, body.to_string()),
            );
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.seen
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            match response {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

/// Create a mock Secret JSON response with base64-encoded data values
pub fn secret_json(name: &str, namespace: &str, entries: &[(&str, &str)]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), STANDARD.encode(value).into()))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "type": "Opaque",
        "data": data
    })
    .to_string()
}

/// Create a mock bootstrap secret. `server` and `namespace` control which of
/// the two required keys are present.
pub fn bootstrap_secret_json(
    secret_namespace: &str,
    server: Option<&str>,
    namespace: Option<&str>,
) -> String {
    let mut entries: Vec<(&str, String)> = Vec::new();
    let kubeconfig = server.map(minimal_kubeconfig);
    if let Some(kubeconfig) = &kubeconfig {
        entries.push(("kubeconfig", kubeconfig.clone()));
    }
    if let Some(namespace) = namespace {
        entries.push(("namespace", namespace.to_string()));
    }

    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect();
    secret_json("herald-kubeconfig", secret_namespace, &borrowed)
}

/// A minimal but complete kubeconfig pointing at the given server
pub fn minimal_kubeconfig(server: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
clusters:
- name: remote
  cluster:
    server: {server}
contexts:
- name: remote
  context:
    cluster: remote
    user: admin
current-context: remote
users:
- name: admin
  user:
    token: sekrit
"#
    )
}

/// Create a mock APIGroup discovery response for a single-version group
pub fn api_group_json(group: &str, version: &str) -> String {
    let group_version = format!("{}/{}", group, version);
    serde_json::json!({
        "kind": "APIGroup",
        "apiVersion": "v1",
        "name": group,
        "versions": [{"groupVersion": group_version, "version": version}],
        "preferredVersion": {"groupVersion": group_version, "version": version}
    })
    .to_string()
}

/// Create a mock APIResourceList discovery response for one namespaced kind
pub fn api_resource_list_json(group_version: &str, kind: &str, plural: &str) -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": [{
            "name": plural,
            "singularName": kind.to_lowercase(),
            "namespaced": true,
            "kind": kind,
            "verbs": ["get", "list", "watch"]
        }]
    })
    .to_string()
}

/// Create a mock RegisteredService JSON response
pub fn registered_service_json(name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "herald.dev/v1alpha1",
        "kind": "RegisteredService",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": {
            "serviceEndpointDefinition": []
        }
    })
    .to_string()
}

/// Create a mock ServiceClassList JSON response from item objects
pub fn service_class_list_json(items: &[serde_json::Value]) -> String {
    serde_json::json!({
        "apiVersion": "herald.dev/v1alpha1",
        "kind": "ServiceClassList",
        "metadata": {
            "resourceVersion": "1"
        },
        "items": items
    })
    .to_string()
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used for server-side apply
pub const OPERATOR_NAME: &str = "herald";

/// API group owning the ServiceClass and RegisteredService CRDs
pub const API_GROUP: &str = "herald.dev";

/// Bootstrap secret contract. The secret is provisioned by an external
/// process into the ServiceClass's namespace; both keys are required.
pub mod bootstrap {
    /// Well-known name of the bootstrap secret
    pub const SECRET_NAME: &str = "herald-kubeconfig";
    /// Key holding the kubeconfig for the control-plane cluster
    pub const KUBECONFIG_KEY: &str = "kubeconfig";
    /// Key holding the target namespace in the control-plane cluster
    pub const NAMESPACE_KEY: &str = "namespace";
}

/// Condition type appended to ServiceClass status on every pass
pub const CONNECTION_CONDITION_TYPE: &str = "Connection";

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

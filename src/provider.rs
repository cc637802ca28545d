use async_trait::async_trait;

use crate::models::{Instance, InstanceSpec, Metadata, Operation};

/// Failure resolving or mutating provider state.
///
/// `NotFound` is kept apart from `Transient` on purpose: the reconciler
/// folds only a genuine not-found into its absent sentinel. A transient
/// provider outage must never be answered with a create.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no instance named {0}")]
    NotFound(String),
    #[error("transient provider failure: {0}")]
    Transient(String),
    #[error("provider rejected the call: {0}")]
    Api(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// The compute control-plane surface this crate consumes: source of truth
/// for instance and operation status, sink for mutation requests.
///
/// Every mutating call returns immediately with a pending [`Operation`]
/// handle; the caller polls it to terminal through `get_operation`. Project
/// and zone are fixed at client construction, not per call.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Look up one instance by name.
    async fn get_instance(&self, name: &str) -> ProviderResult<Instance>;

    /// Create an instance with the spec's machine type and startup payload.
    async fn insert_instance(&self, spec: &InstanceSpec) -> ProviderResult<Operation>;

    /// Start an existing (stopped or terminated) instance.
    async fn start_instance(&self, name: &str) -> ProviderResult<Operation>;

    /// Stop a running instance.
    async fn stop_instance(&self, name: &str) -> ProviderResult<Operation>;

    /// Replace the instance's metadata. `metadata.fingerprint` must hold the
    /// token fetched right before this call or the provider rejects the
    /// write.
    async fn set_metadata(&self, name: &str, metadata: &Metadata) -> ProviderResult<Operation>;

    /// Poll the current status of a previously issued operation.
    async fn get_operation(&self, operation: &Operation) -> ProviderResult<Operation>;
}

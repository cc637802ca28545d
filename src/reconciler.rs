//! The reconcile state machine: observe one instance, drive it toward
//! running with at most one mutation path, never overlap mutations.

use log::info;

use crate::models::{InstanceSpec, InstanceStatus, Metadata};
use crate::provider::{ComputeProvider, ProviderError};
use crate::waiter::OperationWaiter;
use crate::{Error, Result};

/// Which transition a reconcile pass applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Instance did not exist; it was created.
    Created,
    /// Instance was terminated; its startup script was refreshed and it was
    /// started.
    Started,
    /// Instance already satisfied the desired state; nothing was issued.
    AlreadyUp,
}

/// Result of reconciling one instance: the transition applied and the status
/// observed right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub action: ReconcileAction,
    pub status: InstanceStatus,
}

pub struct Reconciler<'a> {
    provider: &'a dyn ComputeProvider,
    waiter: OperationWaiter,
}

impl<'a> Reconciler<'a> {
    pub fn new(provider: &'a dyn ComputeProvider) -> Self {
        Self {
            provider,
            waiter: OperationWaiter::new(),
        }
    }

    pub fn with_waiter(provider: &'a dyn ComputeProvider, waiter: OperationWaiter) -> Self {
        Self { provider, waiter }
    }

    /// Current observed status, folding a not-found lookup into
    /// [`InstanceStatus::Absent`]. Transient lookup failures propagate; an
    /// outage must not be answered with a create.
    pub async fn observe(&self, name: &str) -> Result<InstanceStatus> {
        match self.provider.get_instance(name).await {
            Ok(instance) => Ok(instance.status),
            Err(ProviderError::NotFound(_)) => Ok(InstanceStatus::Absent),
            Err(e) => Err(e.into()),
        }
    }

    /// Drive one instance toward running. Idempotent: an instance that is
    /// already up (or in any transitional state) is left alone.
    ///
    /// Each mutation is awaited to terminal before the next is issued, so at
    /// most one operation is ever in flight for the instance.
    pub async fn reconcile(&self, spec: &InstanceSpec) -> Result<ReconcileOutcome> {
        let observed = self.observe(&spec.name).await?;
        let action = match observed {
            InstanceStatus::Absent => {
                info!("instance {} does not exist, creating", spec.name);
                let operation = self.provider.insert_instance(spec).await?;
                self.waiter.await_terminal(self.provider, operation).await?;
                ReconcileAction::Created
            }
            InstanceStatus::Terminated => {
                info!(
                    "instance {} is terminated, refreshing startup script and starting",
                    spec.name
                );
                // A failed metadata write aborts the start: restarting with
                // the stale script would be a silent wrong result.
                self.refresh_startup_script(spec).await?;
                let operation = self.provider.start_instance(&spec.name).await?;
                self.waiter.await_terminal(self.provider, operation).await?;
                ReconcileAction::Started
            }
            other => {
                info!("instance {} is {}, nothing to do", spec.name, other);
                return Ok(ReconcileOutcome {
                    action: ReconcileAction::AlreadyUp,
                    status: other,
                });
            }
        };
        let status = self.observe(&spec.name).await?;
        Ok(ReconcileOutcome { action, status })
    }

    /// Fingerprint-guarded overwrite of the startup-script metadata entry.
    /// The fingerprint is fetched immediately before the write, never reused
    /// from an earlier observation.
    async fn refresh_startup_script(&self, spec: &InstanceSpec) -> Result<()> {
        let instance = self.provider.get_instance(&spec.name).await?;
        let fingerprint = instance.metadata.fingerprint.ok_or_else(|| {
            Error::Provider(ProviderError::Api(format!(
                "instance {} metadata carries no fingerprint",
                spec.name
            )))
        })?;
        let metadata = Metadata::startup_script(&spec.startup_script).with_fingerprint(fingerprint);
        let operation = self.provider.set_metadata(&spec.name, &metadata).await?;
        self.waiter.await_terminal(self.provider, operation).await?;
        Ok(())
    }
}

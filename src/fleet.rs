//! Fleet profiles and the sequential profile driver.
//!
//! A profile is plain declarative data: an ordered list of members with a
//! machine type and a startup-script path each. The driver reconciles them
//! one at a time in declared order, isolating failures per instance, then
//! re-queries and reports final status for each.

use std::path::{Path, PathBuf};

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::models::{InstanceSpec, InstanceStatus};
use crate::provider::ComputeProvider;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::waiter::OperationWaiter;
use crate::{Error, Result};

/// One declared fleet member. The startup script stays a path here; it is
/// read off disk when the profile is resolved into concrete specs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileEntry {
    pub name: String,
    pub machine_type: String,
    pub startup_script: PathBuf,
}

/// An ordered, enumerated set of instances reconciled as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetProfile {
    pub name: String,
    pub instances: Vec<ProfileEntry>,
}

impl FleetProfile {
    /// Single high-CPU node.
    pub fn openmp() -> Self {
        Self {
            name: "openmp".into(),
            instances: vec![ProfileEntry {
                name: "instance-openmp-01-e2-highcpu-8".into(),
                machine_type: "e2-highcpu-8".into(),
                startup_script: "scripts/openmp-startup.sh".into(),
            }],
        }
    }

    /// Balanced three-node fleet.
    pub fn mpi() -> Self {
        let member = |n: u32| ProfileEntry {
            name: format!("instance-{n:02}-medium"),
            machine_type: "e2-medium".into(),
            startup_script: "scripts/mpi-startup.sh".into(),
        };
        Self {
            name: "mpi".into(),
            instances: (1..=3).map(member).collect(),
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "openmp" => Some(Self::openmp()),
            "mpi" => Some(Self::mpi()),
            _ => None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::FilesysIO(format!("reading profile {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("parsing profile {}: {e}", path.display())))
    }

    /// Read every member's startup script and produce the concrete specs, in
    /// declared order. An unreadable script is fatal: better to stop before
    /// touching the provider than to boot half a fleet with empty payloads.
    pub fn resolve(&self) -> Result<Vec<InstanceSpec>> {
        self.instances
            .iter()
            .map(|entry| {
                let script = std::fs::read_to_string(&entry.startup_script).map_err(|e| {
                    Error::FilesysIO(format!(
                        "reading startup script {}: {e}",
                        entry.startup_script.display()
                    ))
                })?;
                Ok(InstanceSpec::new(&entry.name, &entry.machine_type)
                    .with_startup_script(script))
            })
            .collect()
    }
}

/// Per-instance result of one fleet pass.
#[derive(Debug)]
pub struct InstanceReport {
    pub name: String,
    pub outcome: Result<ReconcileOutcome>,
    /// Status re-queried after the whole pass; `None` when the re-query
    /// itself failed.
    pub final_status: Option<InstanceStatus>,
}

impl InstanceReport {
    pub fn failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Sequentially reconcile every spec, then re-query final status for each.
///
/// No parallelism and no rollback: a member that fails is reported and the
/// rest of the fleet is still driven; earlier successes are kept.
pub async fn drive(
    provider: &dyn ComputeProvider,
    waiter: OperationWaiter,
    specs: &[InstanceSpec],
) -> Vec<InstanceReport> {
    let reconciler = Reconciler::with_waiter(provider, waiter);

    let mut outcomes = Vec::with_capacity(specs.len());
    for spec in specs {
        let outcome = reconciler.reconcile(spec).await;
        if let Err(e) = &outcome {
            error!("reconcile {} failed: {e}", spec.name);
        }
        outcomes.push(outcome);
    }

    let mut reports = Vec::with_capacity(specs.len());
    for (spec, outcome) in specs.iter().zip(outcomes) {
        let final_status = match reconciler.observe(&spec.name).await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("querying final status of {}: {e}", spec.name);
                None
            }
        };
        reports.push(InstanceReport {
            name: spec.name.clone(),
            outcome,
            final_status,
        });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_resolve_by_name() {
        assert_eq!(FleetProfile::builtin("openmp"), Some(FleetProfile::openmp()));
        assert_eq!(FleetProfile::builtin("MPI"), Some(FleetProfile::mpi()));
        assert_eq!(FleetProfile::builtin("bogus"), None);
    }

    #[test]
    fn mpi_profile_declares_three_medium_nodes_in_order() {
        let profile = FleetProfile::mpi();
        let names: Vec<_> = profile.instances.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "instance-01-medium",
                "instance-02-medium",
                "instance-03-medium"
            ]
        );
        assert!(profile
            .instances
            .iter()
            .all(|e| e.machine_type == "e2-medium"));
    }
}

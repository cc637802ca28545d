use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// The lifecycle state of an instance as reported by the provider.
/// This value is read-only for the control-plane.
///
/// `Absent` never comes off the wire: it is the reconciler-level sentinel
/// produced by folding a not-found lookup, meaning "no instance with this
/// name exists yet". Any status string this crate does not know is kept
/// verbatim in `Unknown` rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum InstanceStatus {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Stopped,
    Suspending,
    Suspended,
    Repairing,
    Terminated,
    Unknown(String),
    Absent,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Provisioning => "PROVISIONING",
            InstanceStatus::Staging => "STAGING",
            InstanceStatus::Running => "RUNNING",
            InstanceStatus::Stopping => "STOPPING",
            InstanceStatus::Stopped => "STOPPED",
            InstanceStatus::Suspending => "SUSPENDING",
            InstanceStatus::Suspended => "SUSPENDED",
            InstanceStatus::Repairing => "REPAIRING",
            InstanceStatus::Terminated => "TERMINATED",
            InstanceStatus::Unknown(other) => other,
            InstanceStatus::Absent => "ABSENT",
        }
    }
}

impl From<String> for InstanceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PROVISIONING" => InstanceStatus::Provisioning,
            "STAGING" => InstanceStatus::Staging,
            "RUNNING" => InstanceStatus::Running,
            "STOPPING" => InstanceStatus::Stopping,
            "STOPPED" => InstanceStatus::Stopped,
            "SUSPENDING" => InstanceStatus::Suspending,
            "SUSPENDED" => InstanceStatus::Suspended,
            "REPAIRING" => InstanceStatus::Repairing,
            "TERMINATED" => InstanceStatus::Terminated,
            "ABSENT" => InstanceStatus::Absent,
            _ => InstanceStatus::Unknown(s),
        }
    }
}

impl From<InstanceStatus> for String {
    fn from(status: InstanceStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instance as observed through the provider's control-plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,

    pub status: InstanceStatus,

    /// Current metadata, carrying the fingerprint concurrency token that
    /// guards metadata writes.
    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
}

/// Desired launch parameters for one fleet member. Immutable once submitted
/// to a mutating call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceSpec {
    /// Instance name, unique within a project/zone scope.
    pub name: String,

    /// Machine type identifier resolved by the provider, e.g. `e2-medium`.
    pub machine_type: String,

    /// Startup payload, read once by the guest at boot. Supplied inline at
    /// creation, or written into metadata before a restart.
    pub startup_script: String,
}

impl InstanceSpec {
    pub fn new<S: AsRef<str>, M: AsRef<str>>(name: S, machine_type: M) -> Self {
        Self {
            name: name.as_ref().into(),
            machine_type: machine_type.as_ref().into(),
            startup_script: String::new(),
        }
    }

    pub fn with_startup_script<S: AsRef<str>>(mut self, script: S) -> Self {
        self.startup_script = script.as_ref().into();
        self
    }
}

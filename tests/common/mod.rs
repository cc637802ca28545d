//! Shared test double: an in-memory compute provider that records every
//! call and lets tests script lookup/mutation failures and operation polls.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use vmfleet::models::{
    Instance, InstanceSpec, InstanceStatus, Metadata, Operation, OperationStatus,
    STARTUP_SCRIPT_KEY,
};
use vmfleet::provider::ProviderResult;
use vmfleet::{ComputeProvider, OperationWaiter, ProviderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetInstance(String),
    InsertInstance {
        name: String,
        machine_type: String,
        startup_script: String,
    },
    StartInstance(String),
    StopInstance(String),
    SetMetadata {
        name: String,
        fingerprint: Option<String>,
        startup_script: Option<String>,
    },
    GetOperation(String),
}

pub struct MockCompute {
    pub calls: Mutex<Vec<Call>>,
    pub instances: Mutex<HashMap<String, Instance>>,
    /// Scripted answers for successive `get_operation` polls; once drained,
    /// every poll answers DONE with no error.
    pub operation_polls: Mutex<VecDeque<Operation>>,
    /// When set, `get_operation` always answers PENDING.
    pub hang_operations: Mutex<bool>,
    /// Insert failures injected per instance name.
    pub insert_failures: Mutex<HashMap<String, ProviderError>>,
    pub metadata_failure: Mutex<Option<ProviderError>>,
    pub lookup_failure: Mutex<Option<ProviderError>>,
    /// Status a freshly inserted instance reports, default PROVISIONING.
    pub post_create_status: Mutex<InstanceStatus>,
}

impl MockCompute {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            instances: Mutex::new(HashMap::new()),
            operation_polls: Mutex::new(VecDeque::new()),
            hang_operations: Mutex::new(false),
            insert_failures: Mutex::new(HashMap::new()),
            metadata_failure: Mutex::new(None),
            lookup_failure: Mutex::new(None),
            post_create_status: Mutex::new(InstanceStatus::Provisioning),
        }
    }

    pub fn with_instance(
        self,
        name: &str,
        status: InstanceStatus,
        fingerprint: Option<&str>,
    ) -> Self {
        let mut metadata = Metadata::default();
        if let Some(fingerprint) = fingerprint {
            metadata = metadata.with_fingerprint(fingerprint);
        }
        self.instances.lock().unwrap().insert(
            name.to_owned(),
            Instance {
                name: name.to_owned(),
                status,
                metadata,
                machine_type: None,
            },
        );
        self
    }

    pub fn recorded(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, pred: F) -> usize {
        self.recorded().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn pending(name: String) -> Operation {
        Operation {
            name,
            zone: None,
            status: OperationStatus::Pending,
            error: None,
        }
    }
}

#[async_trait]
impl ComputeProvider for MockCompute {
    async fn get_instance(&self, name: &str) -> ProviderResult<Instance> {
        self.record(Call::GetInstance(name.to_owned()));
        if let Some(e) = self.lookup_failure.lock().unwrap().clone() {
            return Err(e);
        }
        self.instances
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_owned()))
    }

    async fn insert_instance(&self, spec: &InstanceSpec) -> ProviderResult<Operation> {
        self.record(Call::InsertInstance {
            name: spec.name.clone(),
            machine_type: spec.machine_type.clone(),
            startup_script: spec.startup_script.clone(),
        });
        if let Some(e) = self.insert_failures.lock().unwrap().get(&spec.name) {
            return Err(e.clone());
        }
        let status = self.post_create_status.lock().unwrap().clone();
        self.instances.lock().unwrap().insert(
            spec.name.clone(),
            Instance {
                name: spec.name.clone(),
                status,
                metadata: Metadata::startup_script(&spec.startup_script).with_fingerprint("f0"),
                machine_type: Some(spec.machine_type.clone()),
            },
        );
        Ok(Self::pending(format!("op-insert-{}", spec.name)))
    }

    async fn start_instance(&self, name: &str) -> ProviderResult<Operation> {
        self.record(Call::StartInstance(name.to_owned()));
        if let Some(instance) = self.instances.lock().unwrap().get_mut(name) {
            instance.status = InstanceStatus::Running;
        }
        Ok(Self::pending(format!("op-start-{name}")))
    }

    async fn stop_instance(&self, name: &str) -> ProviderResult<Operation> {
        self.record(Call::StopInstance(name.to_owned()));
        if let Some(instance) = self.instances.lock().unwrap().get_mut(name) {
            instance.status = InstanceStatus::Stopped;
        }
        Ok(Self::pending(format!("op-stop-{name}")))
    }

    async fn set_metadata(&self, name: &str, metadata: &Metadata) -> ProviderResult<Operation> {
        self.record(Call::SetMetadata {
            name: name.to_owned(),
            fingerprint: metadata.fingerprint.clone(),
            startup_script: metadata.get(STARTUP_SCRIPT_KEY).map(str::to_owned),
        });
        if let Some(e) = self.metadata_failure.lock().unwrap().clone() {
            return Err(e);
        }
        if let Some(instance) = self.instances.lock().unwrap().get_mut(name) {
            instance.metadata.items = metadata.items.clone();
        }
        Ok(Self::pending(format!("op-setmetadata-{name}")))
    }

    async fn get_operation(&self, operation: &Operation) -> ProviderResult<Operation> {
        self.record(Call::GetOperation(operation.name.clone()));
        if *self.hang_operations.lock().unwrap() {
            return Ok(Self::pending(operation.name.clone()));
        }
        if let Some(scripted) = self.operation_polls.lock().unwrap().pop_front() {
            return Ok(scripted);
        }
        Ok(Operation {
            name: operation.name.clone(),
            zone: None,
            status: OperationStatus::Done,
            error: None,
        })
    }
}

/// Waiter tuned for tests: millisecond polls, generous bound.
pub fn fast_waiter() -> OperationWaiter {
    OperationWaiter::new()
        .interval(std::time::Duration::from_millis(1))
        .timeout(std::time::Duration::from_secs(5))
}

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

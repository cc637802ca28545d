use serde::{Deserialize, Serialize};

/// Metadata key the guest reads its boot payload from.
pub const STARTUP_SCRIPT_KEY: &str = "startup-script";

/// Instance metadata together with the provider's fingerprint concurrency
/// token. Every metadata write must carry the fingerprint of the metadata it
/// intends to replace; a stale fingerprint is rejected by the provider, which
/// is what protects against lost updates from concurrent writers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

impl Metadata {
    /// Metadata holding only a startup-script entry, fingerprint unset.
    pub fn startup_script<S: AsRef<str>>(script: S) -> Self {
        Self {
            fingerprint: None,
            items: vec![MetadataItem {
                key: STARTUP_SCRIPT_KEY.into(),
                value: script.as_ref().into(),
            }],
        }
    }

    pub fn with_fingerprint<S: AsRef<str>>(mut self, fingerprint: S) -> Self {
        self.fingerprint = Some(fingerprint.as_ref().into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Status of an asynchronous control-plane operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "DONE")]
    Done,
}

/// Handle for an asynchronous mutation, returned immediately by every
/// mutating call. The handle itself must be polled until terminal; it is
/// owned by the call site that issued the mutation and discarded once DONE.
///
/// A DONE operation may still carry an embedded error payload (quota
/// exhaustion, invalid image, ...). Callers must check [`error_summary`]
/// before treating DONE as success.
///
/// [`error_summary`]: Operation::error_summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrors>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationErrors {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Joined error payload of a finished operation, `None` when it
    /// completed clean.
    pub fn error_summary(&self) -> Option<String> {
        let errors = &self.error.as_ref()?.errors;
        if errors.is_empty() {
            return None;
        }
        Some(
            errors
                .iter()
                .map(|e| {
                    if e.message.is_empty() {
                        e.code.clone()
                    } else {
                        format!("{}: {}", e.code, e.message)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_with_error_payload_is_not_clean() {
        let operation: Operation = serde_json::from_str(
            r#"{
                "name": "operation-123",
                "status": "DONE",
                "error": {
                    "errors": [
                        {"code": "QUOTA_EXCEEDED", "message": "Quota CPUS exceeded"}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert!(operation.is_done());
        assert_eq!(
            operation.error_summary().as_deref(),
            Some("QUOTA_EXCEEDED: Quota CPUS exceeded")
        );
    }

    #[test]
    fn pending_operation_has_no_error_summary() {
        let operation: Operation =
            serde_json::from_str(r#"{"name": "operation-123", "status": "PENDING"}"#).unwrap();
        assert!(!operation.is_done());
        assert_eq!(operation.error_summary(), None);
    }
}

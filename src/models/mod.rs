pub mod instance;
pub mod metadata;
pub mod operation;

pub use instance::{Instance, InstanceSpec, InstanceStatus};
pub use metadata::{Metadata, MetadataItem, STARTUP_SCRIPT_KEY};
pub use operation::{Operation, OperationErrorDetail, OperationErrors, OperationStatus};

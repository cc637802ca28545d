use log::*;
pub mod auth;
pub mod config;
mod error;
pub mod fleet;
pub mod gcp;
pub mod models;
pub mod provider;
pub mod reconciler;
pub mod waiter;
pub use crate::error::{Error, Result};
pub use crate::provider::{ComputeProvider, ProviderError};
pub use crate::reconciler::{ReconcileAction, ReconcileOutcome, Reconciler};
pub use crate::waiter::OperationWaiter;

#[doc(hidden)]
pub(crate) fn handle_entry<T: Clone>(option: &Option<T>, name: &'static str) -> Result<T> {
    option.clone().ok_or_else(|| {
        let msg = format!("Missing {name} entry");
        error!("{msg}");
        Error::Config(msg)
    })
}

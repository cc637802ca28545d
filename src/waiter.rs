//! Bounded poll loop that blocks the calling flow until an asynchronous
//! provider operation reaches a terminal state.

use std::time::Duration;

use async_channel::Receiver;
use log::{info, trace};
use tokio::time::{sleep, Instant};

use crate::config::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_TIMEOUT_SECS};
use crate::models::Operation;
use crate::provider::ComputeProvider;
use crate::{Error, Result};

/// Polls an operation handle at a fixed interval until it is DONE.
///
/// The wait is bounded: an operation still non-terminal past the timeout
/// yields [`Error::PollTimeout`] instead of spinning forever. A
/// caller-supplied channel aborts an in-progress wait; sending a unit or
/// dropping the sender both count as cancellation.
#[derive(Debug, Clone)]
pub struct OperationWaiter {
    interval: Duration,
    timeout: Duration,
    cancel: Option<Receiver<()>>,
}

impl OperationWaiter {
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            cancel: None,
        }
    }

    /// Interval between status polls.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on the whole wait.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abort the wait when `recv` yields or its sender side is dropped.
    pub fn cancel_on(mut self, recv: Receiver<()>) -> Self {
        self.cancel = Some(recv);
        self
    }

    /// Block until `operation` goes terminal, returning the final polled
    /// handle. At least one poll is always issued; DONE with an embedded
    /// error payload is surfaced as [`Error::Operation`], never as success.
    pub async fn await_terminal(
        &self,
        provider: &dyn ComputeProvider,
        operation: Operation,
    ) -> Result<Operation> {
        let deadline = Instant::now() + self.timeout;
        info!("waiting for operation {} to finish", operation.name);
        loop {
            let polled = provider.get_operation(&operation).await?;
            if polled.is_done() {
                if let Some(detail) = polled.error_summary() {
                    return Err(Error::Operation {
                        name: polled.name,
                        detail,
                    });
                }
                info!("operation {} complete", polled.name);
                return Ok(polled);
            }
            trace!("operation {} is {:?}", polled.name, polled.status);
            if Instant::now() >= deadline {
                return Err(Error::PollTimeout(operation.name.clone(), self.timeout));
            }
            match &self.cancel {
                Some(cancel) => {
                    tokio::select! {
                        _ = sleep(self.interval) => {}
                        _ = cancel.recv() => {
                            return Err(Error::Cancelled(operation.name.clone()));
                        }
                    }
                }
                None => sleep(self.interval).await,
            }
        }
    }
}

impl Default for OperationWaiter {
    fn default() -> Self {
        Self::new()
    }
}

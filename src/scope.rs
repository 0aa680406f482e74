//! Deadlines and cooperative cancellation for provider calls
//!
//! A guarded call races the provider future against its budget and against a
//! cancellation token. Whichever loses is dropped, and dropping an in-flight
//! reqwest future closes its connection.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Result;
use crate::error::ApiError;

/// How a guarded call ended
#[derive(Debug)]
pub enum Outcome<T> {
    Completed(T),
    Failed(ApiError),
    /// The token fired before the call finished
    Aborted,
}

impl<T> Outcome<T> {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }
}

/// Run `future` under `budget`, giving up early when `token` is cancelled.
pub async fn run_guarded<T, F>(
    label: &str,
    budget: Duration,
    token: &CancellationToken,
    future: F,
) -> Outcome<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!("{} aborted by scope cancellation", label);
            Outcome::Aborted
        }
        result = within(label, budget, future) => match result {
            Ok(value) => Outcome::Completed(value),
            Err(err) => {
                warn!("{} failed: {}", label, err);
                Outcome::Failed(err)
            }
        },
    }
}

/// Run `future` under `budget`; expiry is reported as a timeout.
pub async fn within<T, F>(label: &str, budget: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(budget, future).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::timeout(format!(
            "{label} did not answer within {}ms",
            budget.as_millis()
        ))),
    }
}

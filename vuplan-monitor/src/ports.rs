use std::future::Future;
use std::sync::Arc;

use crate::status::RunStatus;

/// A failed remote call. Always transient from the poller's point of view:
/// recovered by retry and reauthentication, never surfaced to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

/// Read side of the remote status port.
pub trait StatusClient {
    fn fetch_status(
        &self,
        run_id: u64,
    ) -> impl Future<Output = Result<RunStatus, FetchError>> + Send;
}

/// Control side of the remote run. Aborts are best-effort: a failure is
/// logged by the caller and never retried.
pub trait ControlClient {
    fn abort_run(&self, run_id: u64) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// Re-establishes the remote session. `login` is idempotent and safely
/// repeatable.
pub trait AuthManager {
    fn login(&self) -> impl Future<Output = Result<(), FetchError>> + Send;
}

impl<T: StatusClient + ?Sized> StatusClient for Arc<T> {
    fn fetch_status(
        &self,
        run_id: u64,
    ) -> impl Future<Output = Result<RunStatus, FetchError>> + Send {
        (**self).fetch_status(run_id)
    }
}

impl<T: ControlClient + ?Sized> ControlClient for Arc<T> {
    fn abort_run(&self, run_id: u64) -> impl Future<Output = Result<(), FetchError>> + Send {
        (**self).abort_run(run_id)
    }
}

impl<T: AuthManager + ?Sized> AuthManager for Arc<T> {
    fn login(&self) -> impl Future<Output = Result<(), FetchError>> + Send {
        (**self).login()
    }
}

mod cancel;
mod config;
mod poller;
mod ports;
mod status;

pub use cancel::CancelSignal;
pub use config::MonitorConfig;
pub use poller::{MonitorExit, MonitorOutcome, RunModel, RunStatusPoller};
pub use ports::{AuthManager, ControlClient, FetchError, StatusClient};
pub use status::{PostRunAction, RunState, RunStatus};

//! Application state.
//!
//! Shared state for all request handlers.

use relay_aws::Notifier;
use relay_oauth::{FlowClient, SignedClient};

/// Application state shared across all handlers.
///
/// Everything here is read-only after startup; handlers clone the clients
/// they need into `spawn_blocking` closures.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Token-flow client (first and third legs).
    pub(crate) flow: FlowClient,
    /// Signed resource-request executor.
    pub(crate) signed: SignedClient,
    /// Outcome notification sink.
    pub(crate) notifier: Notifier,
}

//! Peer link error types

use gossamer_core::ConnectionError;
use thiserror::Error;

/// Errors surfaced by a [`PeerLink`](crate::PeerLink).
///
/// Factory failures during background retries are not represented here:
/// they are swallowed by the reconnect loop and only cause another
/// attempt to be scheduled.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The initial dial at construction time failed. No link exists and
    /// construction is never retried internally.
    #[error("initial connection failed: {0}")]
    Construct(#[source] ConnectionError),

    /// An active connection's send or receive failed. The link drops to
    /// down-retrying; the supervisor itself survives.
    #[error("peer link failed: {0}")]
    Link(#[source] ConnectionError),

    /// Closing the connection failed.
    #[error("closing peer link failed: {0}")]
    Close(#[source] ConnectionError),
}

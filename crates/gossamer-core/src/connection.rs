//! Connection abstraction for peer links
//!
//! The [`Connection`] trait is the seam between the resilience layer and
//! the actual wire transport. How bytes are framed and carried is the
//! implementor's concern; the supervision logic in `gossamer-transport`
//! only sends, receives, and closes.
//!
//! ## Implementations
//!
//! - [`MockConnection`](crate::mock_connection::MockConnection): in-memory
//!   connection for testing (in this crate)
//! - Real wire adapters live in downstream crates

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;

/// Errors surfaced by a connection or while establishing one.
///
/// No distinction is drawn between transport, protocol, or remote-side
/// causes: every variant is treated as a uniform link failure by the
/// resilience layer.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("connection closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote error: {0}")]
    Remote(String),
}

/// One bidirectional channel to a remote endpoint.
///
/// Cancelling a single I/O call is done the Rust way: drop the returned
/// future (or wrap it in `tokio::time::timeout`). Implementations must
/// tolerate that.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Send a batch of messages to the remote endpoint
    async fn send(&self, messages: Vec<Message>) -> Result<(), ConnectionError>;

    /// Receive the next batch of messages from the remote endpoint
    ///
    /// Blocks until data is available or the link fails.
    async fn receive(&self) -> Result<Vec<Message>, ConnectionError>;

    /// Close the connection
    async fn close(&self) -> Result<(), ConnectionError>;
}

/// Establishes a fresh [`Connection`] to one fixed remote endpoint.
///
/// Zero-argument by design: the factory is bound to its endpoint at
/// creation time. Invoked once at supervisor construction and again on
/// every reconnect attempt.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Attempt to establish a new connection
    async fn connect(&self) -> Result<Arc<dyn Connection>, ConnectionError>;
}

//! # Gossamer Core
//!
//! Core types and trait seams for the Gossamer graph-sync client.
//!
//! This crate provides the abstractions the connection-resilience layer
//! (in `gossamer-transport`) is built against, so the same supervision
//! logic works with both real wire transports and in-memory mocks.
//!
//! ## Key Traits
//!
//! - [`Connection`]: one bidirectional channel to a remote endpoint
//! - [`ConnectionFactory`]: establishes a fresh [`Connection`] on demand
//!
//! ## Key Types
//!
//! - [`Message`]: opaque payload with a rewritable destination
//! - [`ConnectionError`]: uniform link-failure error

pub mod connection;
pub mod message;
pub mod mock_connection;

// Re-export main types
pub use connection::{Connection, ConnectionError, ConnectionFactory};
pub use message::Message;
pub use mock_connection::{MockConnection, MockConnectionFactory};

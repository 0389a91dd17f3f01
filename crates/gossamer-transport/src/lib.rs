//! # Gossamer Transport
//!
//! Per-peer connection supervision for the Gossamer graph-sync client.
//!
//! A [`PeerLink`] owns exactly one logical outbound link to a remote
//! peer and keeps it usable across disconnects: any I/O failure takes
//! the link down and starts an unbounded, fixed-delay reconnect loop in
//! the background. Callers keep calling [`PeerLink::send`] and
//! [`PeerLink::receive`]; while the peer is down those are cheap no-ops.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gossamer_transport::{LinkConfig, PeerLink};
//!
//! let link = PeerLink::connect("ws://peer.example/gossamer", factory, LinkConfig::default()).await?;
//! if link.send(&msg, &[]).await? {
//!     // delivered
//! }
//! ```
//!
//! A higher-level coordinator holds one `PeerLink` per remote peer and
//! fans sends across all of them; each peer's copy of a message is
//! retagged with that peer's own URL before it hits the wire.

pub mod config;
pub mod error;
pub mod link;
pub mod scheduler;

// Re-export main types
pub use config::LinkConfig;
pub use error::LinkError;
pub use link::PeerLink;
pub use scheduler::{ScheduledTask, Scheduler, TokioScheduler};

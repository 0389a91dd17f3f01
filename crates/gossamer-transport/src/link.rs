//! Per-peer connection supervision
//!
//! A [`PeerLink`] owns at most one live [`Connection`] to one remote
//! peer URL. Send/receive failures take the link down and start an
//! unbounded fixed-delay reconnect loop; callers never see the link
//! object itself die, only individual I/O results.
//!
//! ## Lock discipline
//!
//! One mutex guards the `{connection slot, down flag}` pair (plus the
//! terminal shutdown latch). All connection I/O — send, receive, close,
//! and the factory dial — runs outside the lock on a handle cloned
//! inside a critical section, so I/O latency on one operation never
//! blocks state inspection by another.
//!
//! ## State machine
//!
//! ```text
//!              send/receive error
//!   ┌──────┐ ───────────────────► ┌───────────────┐
//!   │ Live │                      │ Down-Retrying │◄─┐
//!   └──────┘ ◄─────────────────── └───────┬───────┘  │ dial failed,
//!      │        dial succeeded            │          │ re-schedule
//!      │                                  │ ─────────┘
//!      │ close()                          │ close()
//!      ▼                                  ▼
//!   ┌─────────────────────────────────────────┐
//!   │              Idle/Closed                │  (terminal)
//!   └─────────────────────────────────────────┘
//! ```

use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use gossamer_core::{Connection, ConnectionFactory, Message};

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::scheduler::{Scheduler, TokioScheduler};

/// Mutable link state, guarded by one lock.
struct LinkState {
    /// Exclusively owned current connection; `None` while down or closed
    conn: Option<Arc<dyn Connection>>,
    /// True while no connection is installed but the retry loop is active
    down: bool,
    /// Terminal latch set by `close()`; reconnects observe it and stop
    shutdown: bool,
}

/// Supervises one logical outbound link to a remote peer.
///
/// Construction dials the peer once and either yields a live link or
/// fails outright. After that the link recovers from I/O failures on
/// its own: the failed connection is dropped and a reconnect attempt is
/// scheduled every [`LinkConfig::retry_delay`] until one succeeds or
/// the link is closed.
pub struct PeerLink {
    /// Remote peer URL; also the destination tag stamped on outgoing copies
    url: String,
    /// Opaque identifier, assigned by the owner; empty until set
    id: RwLock<String>,
    factory: Arc<dyn ConnectionFactory>,
    retry_delay: Duration,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<LinkState>,
    /// Handle to self for self-rescheduling reconnect tasks. Holding it
    /// weak lets dropping the last external `Arc` end the retry loop.
    this: Weak<PeerLink>,
}

impl PeerLink {
    /// Establish a link to `url`, dialing the factory exactly once.
    ///
    /// On failure no link exists and construction is never retried
    /// internally. On success the link starts live.
    pub async fn connect(
        url: impl Into<String>,
        factory: Arc<dyn ConnectionFactory>,
        config: LinkConfig,
    ) -> Result<Arc<Self>, LinkError> {
        Self::connect_with_scheduler(url, factory, config, Arc::new(TokioScheduler)).await
    }

    /// Like [`connect`](Self::connect), with an injected [`Scheduler`]
    /// driving the reconnect timing.
    pub async fn connect_with_scheduler(
        url: impl Into<String>,
        factory: Arc<dyn ConnectionFactory>,
        config: LinkConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Arc<Self>, LinkError> {
        let url = url.into();
        let conn = factory.connect().await.map_err(LinkError::Construct)?;
        info!(peer = %url, "peer link established");
        Ok(Arc::new_cyclic(|this| Self {
            url,
            id: RwLock::new(String::new()),
            factory,
            retry_delay: config.retry_delay,
            scheduler,
            state: Mutex::new(LinkState {
                conn: Some(conn),
                down: false,
                shutdown: false,
            }),
            this: this.clone(),
        }))
    }

    /// Peer URL this link is bound to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opaque identifier assigned by the owner; empty until set.
    /// Never derived from the URL.
    pub fn id(&self) -> String {
        self.id.read().expect("id lock poisoned").clone()
    }

    /// Assign the opaque identifier
    pub fn set_id(&self, id: impl Into<String>) {
        *self.id.write().expect("id lock poisoned") = id.into();
    }

    /// The live connection, or `None` while the peer is considered
    /// unreachable (down-retrying or closed).
    ///
    /// The handle is cloned inside the critical section; the lock is
    /// never held across I/O.
    pub async fn current_connection(&self) -> Option<Arc<dyn Connection>> {
        self.state.lock().await.conn.clone()
    }

    /// True once the link is idle: no connection installed and no retry
    /// pending. Does not distinguish never-connected from explicitly
    /// closed.
    pub async fn is_closed(&self) -> bool {
        let state = self.state.lock().await;
        state.conn.is_none() && !state.down
    }

    /// Forward a message (plus any additional messages) to this peer.
    ///
    /// Returns `Ok(false)` without touching the wire when the peer is
    /// currently down — sending to a down peer is a normal no-op
    /// signal, not a fault. Otherwise each message is forwarded as an
    /// independent copy retagged with this link's URL, so the same
    /// in-memory message can be fanned out to several peers; the
    /// caller's originals are never modified.
    ///
    /// On I/O failure the connection is dropped, the reconnect loop
    /// starts, and the underlying error is returned.
    pub async fn send(&self, message: &Message, additional: &[Message]) -> Result<bool, LinkError> {
        let Some(conn) = self.current_connection().await else {
            return Ok(false);
        };

        let mut outgoing = Vec::with_capacity(1 + additional.len());
        outgoing.push(self.retag(message));
        outgoing.extend(additional.iter().map(|msg| self.retag(msg)));

        match conn.send(outgoing).await {
            Ok(()) => Ok(true),
            Err(error) => {
                self.mark_errored(&conn).await;
                Err(LinkError::Link(error))
            }
        }
    }

    /// Receive the next batch of messages from this peer.
    ///
    /// Returns `Ok(None)` when the peer is currently down. On I/O
    /// failure the connection is dropped, the reconnect loop starts,
    /// and the underlying error is returned.
    pub async fn receive(&self) -> Result<Option<Vec<Message>>, LinkError> {
        let Some(conn) = self.current_connection().await else {
            return Ok(None);
        };
        match conn.receive().await {
            Ok(messages) => Ok(Some(messages)),
            Err(error) => {
                self.mark_errored(&conn).await;
                Err(LinkError::Link(error))
            }
        }
    }

    /// Close the link.
    ///
    /// Terminal with respect to automatic recovery: the down flag is
    /// cleared and the shutdown latch set, so pending and future
    /// reconnect attempts fire as no-ops. A close error from the
    /// underlying connection is propagated; a second close succeeds
    /// trivially.
    pub async fn close(&self) -> Result<(), LinkError> {
        let conn = {
            let mut state = self.state.lock().await;
            state.shutdown = true;
            state.down = false;
            state.conn.take()
        };
        match conn {
            Some(conn) => {
                info!(peer = %self.url, "peer link closed");
                conn.close().await.map_err(LinkError::Close)
            }
            None => Ok(()),
        }
    }

    /// Independent copy of `message` addressed to this peer
    fn retag(&self, message: &Message) -> Message {
        let mut copy = message.clone();
        copy.to = self.url.clone();
        copy
    }

    /// Drop `failed` if it is still the active connection and start the
    /// retry loop.
    ///
    /// A stale caller racing a reconnect that already replaced the
    /// connection finds the identity check false and becomes a no-op.
    /// The old connection is closed best-effort; its close error is
    /// never propagated.
    async fn mark_errored(&self, failed: &Arc<dyn Connection>) {
        let old = {
            let mut state = self.state.lock().await;
            let is_current = state
                .conn
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, failed));
            if !is_current {
                return;
            }
            state.down = true;
            state.conn.take()
        };
        warn!(peer = %self.url, "peer link errored, scheduling reconnect");
        if let Some(conn) = old {
            if let Err(error) = conn.close().await {
                debug!(peer = %self.url, error = %error, "closing errored connection failed");
            }
        }
        self.schedule_reconnect();
    }

    /// Schedule one reconnect attempt after the fixed retry delay.
    ///
    /// The task holds only a weak handle; if the link has been dropped
    /// by then, the attempt evaporates.
    fn schedule_reconnect(&self) {
        let link = self.this.clone();
        self.scheduler.schedule(
            self.retry_delay,
            Box::pin(async move {
                if let Some(link) = link.upgrade() {
                    link.reconnect().await;
                }
            }),
        );
    }

    /// One reconnect attempt, fired by the scheduler.
    ///
    /// Only proceeds when the link is exactly down-retrying; clearing
    /// the down flag first claims the attempt, so a stale or duplicate
    /// timer firing later finds the flag changed and stops. The dial
    /// runs outside the lock; if `close()` lands while dialing, a
    /// successful dial result is closed and discarded.
    async fn reconnect(&self) {
        {
            let mut state = self.state.lock().await;
            if state.shutdown || state.conn.is_some() || !state.down {
                return;
            }
            state.down = false;
        }

        match self.factory.connect().await {
            Ok(conn) => {
                let discarded = {
                    let mut state = self.state.lock().await;
                    if state.shutdown {
                        Some(conn)
                    } else {
                        state.conn = Some(conn);
                        None
                    }
                };
                match discarded {
                    None => info!(peer = %self.url, "peer link restored"),
                    Some(conn) => {
                        if let Err(error) = conn.close().await {
                            debug!(peer = %self.url, error = %error, "closing discarded connection failed");
                        }
                    }
                }
            }
            Err(error) => {
                {
                    let mut state = self.state.lock().await;
                    if state.shutdown {
                        return;
                    }
                    state.down = true;
                }
                debug!(peer = %self.url, error = %error, "reconnect attempt failed, retrying");
                self.schedule_reconnect();
            }
        }
    }
}

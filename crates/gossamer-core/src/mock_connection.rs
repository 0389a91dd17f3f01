//! Mock connection implementation for testing
//!
//! Provides an in-memory connection and factory for exercising the
//! resilience layer without real network connections. Failures are
//! scripted: queue up error outcomes and the mock consumes them in order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gossamer_core::{Connection, MockConnection, MockConnectionFactory};
//!
//! let factory = MockConnectionFactory::new();
//! factory.push_failure("peer unreachable");
//!
//! // First connect fails, the next one succeeds with a fresh connection.
//! assert!(factory.connect().await.is_err());
//! let conn = factory.connect().await.unwrap();
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::connection::{Connection, ConnectionError, ConnectionFactory};
use crate::message::Message;

/// An in-memory connection with scripted behavior.
///
/// Records every message it is asked to send, serves receives from a
/// scripted inbox, and fails on demand. Receiving with an empty inbox
/// reports the connection as closed.
#[derive(Default)]
pub struct MockConnection {
    /// Flat record of every message forwarded through this connection
    sent: Mutex<Vec<Message>>,
    /// Errors to return from upcoming send calls, consumed in order
    send_failures: Mutex<VecDeque<ConnectionError>>,
    /// Scripted receive outcomes, consumed in order
    inbox: Mutex<VecDeque<Result<Vec<Message>, ConnectionError>>>,
    /// Error to return from the next close call
    close_failure: Mutex<Option<ConnectionError>>,
    /// Whether close() has been called
    closed: AtomicBool,
}

impl MockConnection {
    /// Create a mock connection that succeeds at everything
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue an error for an upcoming send call
    pub fn fail_next_send(&self, error: ConnectionError) {
        self.send_failures
            .lock()
            .expect("send failure queue poisoned")
            .push_back(error);
    }

    /// Queue messages to be handed out by an upcoming receive call
    pub fn push_incoming(&self, messages: Vec<Message>) {
        self.inbox
            .lock()
            .expect("inbox poisoned")
            .push_back(Ok(messages));
    }

    /// Queue an error for an upcoming receive call
    pub fn fail_next_receive(&self, error: ConnectionError) {
        self.inbox
            .lock()
            .expect("inbox poisoned")
            .push_back(Err(error));
    }

    /// Make the next close call fail with the given error
    pub fn fail_close(&self, error: ConnectionError) {
        *self.close_failure.lock().expect("close failure poisoned") = Some(error);
    }

    /// Every message sent through this connection so far
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent.lock().expect("sent record poisoned").clone()
    }

    /// Whether close() has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn send(&self, messages: Vec<Message>) -> Result<(), ConnectionError> {
        if let Some(error) = self
            .send_failures
            .lock()
            .expect("send failure queue poisoned")
            .pop_front()
        {
            return Err(error);
        }
        self.sent
            .lock()
            .expect("sent record poisoned")
            .extend(messages);
        Ok(())
    }

    async fn receive(&self) -> Result<Vec<Message>, ConnectionError> {
        match self.inbox.lock().expect("inbox poisoned").pop_front() {
            Some(outcome) => outcome,
            None => Err(ConnectionError::Closed),
        }
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.closed.store(true, Ordering::SeqCst);
        match self.close_failure.lock().expect("close failure poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// A factory with a scripted queue of connect outcomes.
///
/// Counts attempts and remembers every connection it handed out. When
/// the queue is empty, a connect succeeds with a fresh
/// [`MockConnection`].
#[derive(Default)]
pub struct MockConnectionFactory {
    outcomes: Mutex<VecDeque<Result<Arc<MockConnection>, ConnectionError>>>,
    attempts: AtomicUsize,
    handed_out: Mutex<Vec<Arc<MockConnection>>>,
}

impl MockConnectionFactory {
    /// Create a factory that always succeeds with fresh connections
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a specific connection for an upcoming connect call
    pub fn push_connection(&self, connection: Arc<MockConnection>) {
        self.outcomes
            .lock()
            .expect("outcome queue poisoned")
            .push_back(Ok(connection));
    }

    /// Queue a failure for an upcoming connect call
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.outcomes
            .lock()
            .expect("outcome queue poisoned")
            .push_back(Err(ConnectionError::Connect(reason.into())));
    }

    /// Number of connect attempts made so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Every connection handed out so far, in order
    pub fn connections(&self) -> Vec<Arc<MockConnection>> {
        self.handed_out.lock().expect("handout record poisoned").clone()
    }

    /// The most recently handed-out connection, if any
    pub fn latest(&self) -> Option<Arc<MockConnection>> {
        self.handed_out
            .lock()
            .expect("handout record poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl ConnectionFactory for MockConnectionFactory {
    async fn connect(&self) -> Result<Arc<dyn Connection>, ConnectionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .expect("outcome queue poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Arc::new(MockConnection::default())));
        let connection = outcome?;
        self.handed_out
            .lock()
            .expect("handout record poisoned")
            .push(connection.clone());
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages() {
        let conn = MockConnection::new();
        conn.send(vec![Message::to("ws://peer/gossamer", b"a".to_vec())])
            .await
            .unwrap();
        conn.send(vec![Message::to("ws://peer/gossamer", b"b".to_vec())])
            .await
            .unwrap();

        let sent = conn.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].body, b"b");
    }

    #[tokio::test]
    async fn scripted_send_failure_is_consumed_in_order() {
        let conn = MockConnection::new();
        conn.fail_next_send(ConnectionError::Remote("reset".into()));

        assert!(conn.send(vec![Message::new(b"x".to_vec())]).await.is_err());
        assert!(conn.send(vec![Message::new(b"y".to_vec())]).await.is_ok());
        assert_eq!(conn.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn empty_inbox_reads_as_closed() {
        let conn = MockConnection::new();
        conn.push_incoming(vec![Message::new(b"hello".to_vec())]);

        let msgs = conn.receive().await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(
            conn.receive().await,
            Err(ConnectionError::Closed)
        ));
    }

    #[tokio::test]
    async fn factory_counts_attempts_and_remembers_connections() {
        let factory = MockConnectionFactory::new();
        factory.push_failure("unreachable");

        assert!(factory.connect().await.is_err());
        let conn = factory.connect().await.unwrap();
        conn.send(vec![Message::new(b"ping".to_vec())]).await.unwrap();

        assert_eq!(factory.attempts(), 2);
        assert_eq!(factory.connections().len(), 1);
        assert_eq!(factory.latest().unwrap().sent_messages().len(), 1);
    }
}

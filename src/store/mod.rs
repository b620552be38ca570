//! The shared text document, its writer lease, and the parked long-polls
//! waiting for the next change.
//!
//! All state lives behind one mutex so every operation is atomic with
//! respect to the others. Nothing in here awaits.

pub mod document;
pub mod error;
pub mod identity;
pub mod lease;
pub mod waiter;

use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub use document::Document;
pub use error::StoreError;
pub use identity::Identity;
pub use waiter::Notification;

use lease::{WriterLease, DEFAULT_LEASE_TTL};
use waiter::{fan_out, Waiter, WaiterSink};

/// Result of a successful write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAck {
    pub signature: String,
    pub delivered: usize,
    pub skipped: usize,
}

/// What `await_change` did with the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeWait {
    /// Caller was behind and got the current document right away
    Immediate,
    /// Caller was parked until the next write
    Pending,
}

struct StoreState {
    document: Document,
    lease: WriterLease,
    waiters: Vec<Waiter>,
}

pub struct SharedDocumentStore {
    state: Mutex<StoreState>,
}

impl SharedDocumentStore {
    pub fn new(initial_body: impl Into<Bytes>, lease_ttl: Duration) -> Self {
        Self {
            state: Mutex::new(StoreState {
                document: Document::new(initial_body),
                lease: WriterLease::new(lease_ttl),
                waiters: Vec::new(),
            }),
        }
    }

    // Every critical section leaves the state consistent, so a poisoned
    // lock is still safe to use.
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current document snapshot
    pub fn read(&self) -> Document {
        self.state().document.clone()
    }

    /// Identity holding a live writer lease, if any
    pub fn writer(&self) -> Option<Identity> {
        self.state().lease.holder_at(Instant::now()).cloned()
    }

    pub fn lease_ttl(&self) -> Duration {
        self.state().lease.ttl()
    }

    /// Number of parked long-polls, dead or alive
    pub fn pending_waiters(&self) -> usize {
        self.state().waiters.len()
    }

    /// Acquire or renew the writer lease for `identity`
    pub fn acquire_lease(&self, identity: &Identity) -> bool {
        self.state().lease.acquire_at(identity, Instant::now())
    }

    /// Replace the document and wake every parked long-poll with it
    pub fn write(&self, identity: &Identity, body: impl Into<Bytes>) -> Result<WriteAck, StoreError> {
        let mut state = self.state();

        if !state.lease.acquire_at(identity, Instant::now()) {
            error!("{} didn't have the writer lease", identity);
            return Err(StoreError::LockDenied);
        }

        state.document = Document::new(body);
        let notification = Notification {
            document: state.document.clone(),
            writer: Some(identity.clone()),
        };
        let waiters = std::mem::take(&mut state.waiters);

        info!("Sending new text to {} listeners", waiters.len());
        let report = fan_out(waiters, &notification);
        if report.skipped > 0 {
            warn!(
                "Skipped {} of {} listeners for signature {}",
                report.skipped,
                report.delivered + report.skipped,
                notification.document.signature
            );
        }

        Ok(WriteAck {
            signature: notification.document.signature,
            delivered: report.delivered,
            skipped: report.skipped,
        })
    }

    /// Hand `sink` the current document if the caller is behind, otherwise
    /// park it until the next write.
    ///
    /// The current lease holder is never treated as behind: it already has
    /// what it just wrote. Listeners that hung up since the last write are
    /// dropped before a new one is parked.
    pub fn await_change(
        &self,
        identity: &Identity,
        known_signature: Option<&str>,
        sink: impl WaiterSink + 'static,
    ) -> ChangeWait {
        let mut state = self.state();

        let writer = state.lease.holder_at(Instant::now()).cloned();
        let is_writer = writer.as_ref() == Some(identity);
        let stale = known_signature != Some(state.document.signature.as_str()) && !is_writer;

        if stale {
            let waiter = Waiter::new(identity.clone(), sink);
            let notification = Notification {
                document: state.document.clone(),
                writer,
            };
            if let Err(e) = waiter.notify(notification) {
                warn!("Error delivering text to listener {}: {}", identity, e);
            }
            return ChangeWait::Immediate;
        }

        let before = state.waiters.len();
        state.waiters.retain(Waiter::is_alive);
        let pruned = before - state.waiters.len();
        if pruned > 0 {
            debug!("Dropped {} listeners that hung up", pruned);
        }

        debug!("Parking listener {} ({} already waiting)", identity, state.waiters.len());
        state.waiters.push(Waiter::new(identity.clone(), sink));
        ChangeWait::Pending
    }
}

impl Default for SharedDocumentStore {
    fn default() -> Self {
        Self::new("Hello World", DEFAULT_LEASE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::document::signature_of;
    use tokio::sync::oneshot;

    fn listener() -> (oneshot::Sender<Notification>, oneshot::Receiver<Notification>) {
        oneshot::channel()
    }

    fn alice() -> Identity {
        Identity::new("alice")
    }

    fn bob() -> Identity {
        Identity::new("bob")
    }

    #[test]
    fn test_initial_document() {
        let store = SharedDocumentStore::default();
        let doc = store.read();
        assert_eq!(doc.body_text(), "Hello World");
        assert_eq!(doc.signature, signature_of(b"Hello World"));
        assert!(store.writer().is_none());
        assert_eq!(store.pending_waiters(), 0);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "draft").unwrap();
        assert_eq!(store.read(), store.read());
    }

    #[test]
    fn test_signature_tracks_every_write() {
        let store = SharedDocumentStore::default();
        for body in ["one", "two", "three"] {
            let ack = store.write(&alice(), body).unwrap();
            let doc = store.read();
            assert_eq!(ack.signature, signature_of(body.as_bytes()));
            assert_eq!(doc.signature, signature_of(&doc.body));
            assert_eq!(doc.body_text(), body);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_lease_denies_other_writer() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "mine").unwrap();
        let before = store.read();

        tokio::time::advance(DEFAULT_LEASE_TTL - Duration::from_millis(100)).await;

        assert_eq!(store.write(&bob(), "theirs"), Err(StoreError::LockDenied));
        assert_eq!(store.read(), before);
        assert_eq!(store.writer(), Some(alice()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lease_allows_other_writer() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "mine").unwrap();

        tokio::time::advance(DEFAULT_LEASE_TTL + Duration::from_millis(100)).await;
        assert!(store.writer().is_none());

        store.write(&bob(), "theirs").unwrap();
        assert_eq!(store.read().body_text(), "theirs");
        assert_eq!(store.writer(), Some(bob()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_writes_keep_the_lease() {
        let store = SharedDocumentStore::default();
        for _ in 0..4 {
            store.write(&alice(), "typing").unwrap();
            tokio::time::advance(Duration::from_secs(3)).await;
        }
        assert!(!store.acquire_lease(&bob()));
        assert!(store.acquire_lease(&alice()));
    }

    #[test]
    fn test_stale_listener_gets_snapshot_immediately() {
        let store = SharedDocumentStore::default();
        let (tx, mut rx) = listener();

        let outcome = store.await_change(&bob(), Some("not-a-signature"), tx);

        assert_eq!(outcome, ChangeWait::Immediate);
        let note = rx.try_recv().unwrap();
        assert_eq!(note.document, store.read());
        assert!(note.writer.is_none());
        assert_eq!(store.pending_waiters(), 0);
    }

    #[test]
    fn test_immediate_snapshot_names_the_live_writer() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "fresh").unwrap();
        let (tx, mut rx) = listener();

        store.await_change(&bob(), None, tx);

        let note = rx.try_recv().unwrap();
        assert!(note.is_from(&alice()));
        assert!(!note.is_from(&bob()));
    }

    #[test]
    fn test_missing_signature_counts_as_stale() {
        let store = SharedDocumentStore::default();
        let (tx, mut rx) = listener();

        assert_eq!(store.await_change(&bob(), None, tx), ChangeWait::Immediate);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_current_listener_is_parked() {
        let store = SharedDocumentStore::default();
        let sig = store.read().signature;
        let (tx, mut rx) = listener();

        assert_eq!(store.await_change(&bob(), Some(&sig), tx), ChangeWait::Pending);
        assert!(rx.try_recv().is_err());
        assert_eq!(store.pending_waiters(), 1);
    }

    #[test]
    fn test_lease_holder_is_parked_even_when_behind() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "fresh").unwrap();
        let (tx, mut rx) = listener();

        let outcome = store.await_change(&alice(), Some("old"), tx);

        assert_eq!(outcome, ChangeWait::Pending);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_immediate_delivery_to_closed_listener_is_tolerated() {
        let store = SharedDocumentStore::default();
        let (tx, rx) = listener();
        drop(rx);

        assert_eq!(store.await_change(&bob(), None, tx), ChangeWait::Immediate);
        assert_eq!(store.pending_waiters(), 0);
    }

    #[test]
    fn test_fan_out_skips_closed_listeners() {
        let store = SharedDocumentStore::default();
        let sig = store.read().signature;

        let mut receivers = Vec::new();
        for i in 0..5 {
            let (tx, rx) = listener();
            store.await_change(&Identity::new(format!("client-{i}")), Some(&sig), tx);
            receivers.push(rx);
        }
        assert_eq!(store.pending_waiters(), 5);

        // Every other listener hangs up before the write
        let live: Vec<_> = receivers
            .into_iter()
            .enumerate()
            .filter_map(|(i, rx)| (i % 2 == 0).then_some(rx))
            .collect();

        let ack = store.write(&alice(), "Hello Mars").unwrap();

        assert_eq!(ack.delivered, 3);
        assert_eq!(ack.skipped, 2);
        assert_eq!(store.pending_waiters(), 0);
        for mut rx in live {
            let note = rx.try_recv().unwrap();
            assert_eq!(note.document.body_text(), "Hello Mars");
            assert_eq!(note.document.signature, ack.signature);
            assert!(note.is_from(&alice()));
        }
    }

    #[test]
    fn test_hung_up_listeners_do_not_pile_up() {
        let store = SharedDocumentStore::default();
        let sig = store.read().signature;

        for _ in 0..200 {
            let (tx, rx) = listener();
            store.await_change(&bob(), Some(&sig), tx);
            drop(rx);
        }
        assert_eq!(store.pending_waiters(), 1);

        let (tx, mut rx) = listener();
        store.await_change(&Identity::new("carol"), Some(&sig), tx);
        assert_eq!(store.pending_waiters(), 1);

        let ack = store.write(&alice(), "after the lull").unwrap();
        assert_eq!((ack.delivered, ack.skipped), (1, 0));
        assert_eq!(rx.try_recv().unwrap().document.body_text(), "after the lull");
    }

    #[test]
    fn test_live_listeners_survive_pruning() {
        let store = SharedDocumentStore::default();
        let sig = store.read().signature;

        let (tx_keep, mut rx_keep) = listener();
        store.await_change(&bob(), Some(&sig), tx_keep);
        let (tx_gone, rx_gone) = listener();
        store.await_change(&Identity::new("carol"), Some(&sig), tx_gone);
        drop(rx_gone);
        let (tx_new, mut rx_new) = listener();
        store.await_change(&Identity::new("dave"), Some(&sig), tx_new);

        assert_eq!(store.pending_waiters(), 2);
        let ack = store.write(&alice(), "both").unwrap();
        assert_eq!(ack.delivered, 2);
        assert!(rx_keep.try_recv().is_ok());
        assert!(rx_new.try_recv().is_ok());
    }

    #[test]
    fn test_denied_write_leaves_waiters_parked() {
        let store = SharedDocumentStore::default();
        store.write(&alice(), "mine").unwrap();
        let sig = store.read().signature;
        let (tx, mut rx) = listener();
        store.await_change(&Identity::new("carol"), Some(&sig), tx);

        assert!(store.write(&bob(), "theirs").is_err());

        assert_eq!(store.pending_waiters(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_each_write_wakes_a_listener_once() {
        let store = SharedDocumentStore::default();
        let sig = store.read().signature;
        let (tx, mut rx) = listener();
        store.await_change(&bob(), Some(&sig), tx);

        store.write(&alice(), "first").unwrap();
        let ack = store.write(&alice(), "second").unwrap();

        assert_eq!(rx.try_recv().unwrap().document.body_text(), "first");
        assert_eq!(ack.delivered, 0);
    }

    #[test]
    fn test_hello_mars_scenario() {
        let store = SharedDocumentStore::default();
        let a = alice();
        let b = bob();

        store.write(&a, "Hello World").unwrap();
        assert_eq!(store.read().signature, signature_of(b"Hello World"));

        let (tx, mut rx) = listener();
        assert_eq!(store.await_change(&b, Some(""), tx), ChangeWait::Immediate);
        let seen = rx.try_recv().unwrap().document;
        assert_eq!(seen.body_text(), "Hello World");
        assert_eq!(seen.signature, signature_of(b"Hello World"));

        let (tx, mut rx) = listener();
        assert_eq!(
            store.await_change(&b, Some(&seen.signature), tx),
            ChangeWait::Pending
        );

        store.write(&a, "Hello Mars").unwrap();
        let woken = rx.try_recv().unwrap().document;
        assert_eq!(woken.body_text(), "Hello Mars");
        assert_eq!(woken.signature, signature_of(b"Hello Mars"));
    }
}

use std::fmt;

use tokio::sync::oneshot;
use tracing::warn;

use super::document::Document;
use super::error::WaiterDeliveryFailed;
use super::identity::Identity;

/// What a woken long-poll receives: the new document, and who held the
/// writer lease at the moment it was handed over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub document: Document,
    pub writer: Option<Identity>,
}

impl Notification {
    /// True when `identity` produced this change itself
    pub fn is_from(&self, identity: &Identity) -> bool {
        self.writer.as_ref() == Some(identity)
    }
}

/// Destination of a parked long-poll.
///
/// Implementations must not call back into the store: delivery happens
/// while the store lock is held.
pub trait WaiterSink: Send {
    /// Whether anyone is still listening on the other end
    fn is_alive(&self) -> bool;

    /// Complete the parked call. Called at most once.
    fn deliver(self: Box<Self>, notification: Notification) -> Result<(), WaiterDeliveryFailed>;
}

impl WaiterSink for oneshot::Sender<Notification> {
    fn is_alive(&self) -> bool {
        !self.is_closed()
    }

    fn deliver(self: Box<Self>, notification: Notification) -> Result<(), WaiterDeliveryFailed> {
        (*self)
            .send(notification)
            .map_err(|_| WaiterDeliveryFailed::ReceiverGone)
    }
}

/// One registered long-poll
pub struct Waiter {
    pub identity: Identity,
    sink: Box<dyn WaiterSink>,
}

impl Waiter {
    pub fn new(identity: Identity, sink: impl WaiterSink + 'static) -> Self {
        Self {
            identity,
            sink: Box::new(sink),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.sink.is_alive()
    }

    /// Check liveness, then deliver
    pub fn notify(self, notification: Notification) -> Result<(), WaiterDeliveryFailed> {
        if !self.sink.is_alive() {
            return Err(WaiterDeliveryFailed::Disconnected);
        }
        self.sink.deliver(notification)
    }
}

impl fmt::Debug for Waiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("identity", &self.identity)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Per-write delivery outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub skipped: usize,
}

/// Deliver `notification` to every waiter in registration order.
/// A failed delivery is logged and counted; it never stops the loop.
pub fn fan_out(waiters: Vec<Waiter>, notification: &Notification) -> FanOut {
    let mut report = FanOut::default();
    for waiter in waiters {
        let identity = waiter.identity.clone();
        match waiter.notify(notification.clone()) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                warn!("Error delivering text to listener {}: {}", identity, e);
                report.skipped += 1;
            }
        }
    }
    report
}

/// Failures surfaced to callers of the document store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Writer lease is held by another client")]
    LockDenied,
}

/// A single long-poll delivery that could not be completed.
/// Only ever logged; never returned to the writer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaiterDeliveryFailed {
    #[error("listener connection already closed")]
    Disconnected,

    #[error("listener went away during delivery")]
    ReceiverGone,

    #[error("listener rejected delivery: {0}")]
    Rejected(String),
}

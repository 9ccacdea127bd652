//! Scheduler error types.

/// Errors returned by [`TickleManager`](crate::TickleManager) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickleError {
    /// The client is not in the active set.
    #[error("tickle client {0} is not registered")]
    NotRegistered(String),

    /// An interval of zero frames was requested.
    #[error("tickle interval must be at least one frame")]
    ZeroInterval,
}

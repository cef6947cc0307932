//! Host error types.

use derive_more::{Display, Error, From};
use strictly_memory::LayoutError;

/// Errors returned by a [`HostHandle`](crate::HostHandle).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum HostError {
    /// The host task has stopped and no longer accepts commands.
    #[display("Session host has shut down")]
    #[from(ignore)]
    Closed,

    /// The requested board could not be laid out; the old board is kept.
    #[display("Rebuild rejected: {_0}")]
    Layout(LayoutError),
}

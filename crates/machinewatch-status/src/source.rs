//! Status source collaborator interface.

use machinewatch_core::{StatusSnapshot, TransportError};

/// A control-system status feed
///
/// `poll` refreshes the in-process snapshot; `snapshot` reads it back. The
/// watcher only reads the snapshot after a successful poll.
pub trait StatusSource: Send {
    /// Refresh the snapshot from the control system
    fn poll(&mut self) -> Result<(), TransportError>;

    /// The snapshot captured by the last successful poll
    fn snapshot(&self) -> &StatusSnapshot;
}

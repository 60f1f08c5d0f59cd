//! Job status model.
//!
//! No magic numbers — every status literal used in queries is a named
//! constant here.

/// Database representation of a job status.
pub type StatusId = i16;

/// Lifecycle of a capture job: `Pending → Running → {Completed, Failed}`.
///
/// Terminal states are never revisited; there is no retry-from-`Failed`
/// in this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum JobStatus {
    /// Enqueued, not yet claimed by a worker.
    Pending = 1,
    /// Claimed by a worker and executing.
    Running = 2,
    /// All processing steps succeeded; the command was published.
    Completed = 3,
    /// A processing step failed; no command was published.
    Failed = 4,
}

impl JobStatus {
    pub fn id(self) -> StatusId {
        self as StatusId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ids_are_stable() {
        // These values are persisted; changing them requires a migration.
        assert_eq!(JobStatus::Pending.id(), 1);
        assert_eq!(JobStatus::Running.id(), 2);
        assert_eq!(JobStatus::Completed.id(), 3);
        assert_eq!(JobStatus::Failed.id(), 4);
    }
}

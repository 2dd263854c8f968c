//! Lightweight unique identifier for stages within a [`Pipeline`](crate::pipeline::Pipeline).
//!
//! Each stage attached to the pipeline chain is assigned a sequential
//! `StageId`. These are opaque handles; only the builder and the runner
//! inspect them directly.
//!
//! They're small, `Copy`, and hashable, so they can be used efficiently as
//! keys when the runner extracts the stage chain for execution.

use serde::{Deserialize, Serialize};

/// Unique numeric identifier for a stage in a pipeline chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StageId(u64);

impl StageId {
    /// Create a new `StageId` (used internally by the pipeline).
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    ///
    /// Useful mainly for debugging or serialization.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

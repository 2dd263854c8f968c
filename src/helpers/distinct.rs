//! Deduplication stages: structural [`Stream::distinct`] and projected
//! [`Stream::distinct_by`].
//!
//! Both keep the *first* occurrence and drop later duplicates. Equality for
//! `distinct` is the engine's built-in structural equality over [`Value`];
//! `distinct_by` projects each element to a key first and deduplicates on
//! the projection. In sequential mode the surviving elements keep their
//! first-occurrence order; under a parallel marker no order is guaranteed.

use crate::stage::StageOp;
use crate::value::Value;
use crate::Stream;
use std::sync::Arc;

impl Stream {
    /// Drop every element structurally equal to one already seen.
    ///
    /// Idempotent: a second `distinct` passes everything through.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline};
    ///
    /// let p = Pipeline::default();
    /// assert_eq!(stream_of!(&p, 5, 5, 5).distinct().count()?, 1);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn distinct(self) -> Stream {
        self.attach(StageOp::Distinct)
    }

    /// Drop every element whose projected key has already been seen.
    ///
    /// The first element per key survives; the key must be usable for the
    /// engine's structural equality (any [`Value`] is).
    #[must_use]
    pub fn distinct_by<F>(self, key: F) -> Stream
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.attach(StageOp::DistinctBy(Arc::new(key)))
    }
}

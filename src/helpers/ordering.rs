//! Positional and ordering stages: [`Stream::skip`], [`Stream::limit`],
//! and [`Stream::sort`].
//!
//! `skip` and `limit` are stateless counters. `limit` is also the engine's
//! canonical short-circuit: once its budget is spent it answers the
//! cancellation poll with `true` forever, and the source stops pushing.
//! `sort` is stateful: it buffers the entire upstream, stable-sorts it at
//! end-of-stream, and replays downstream -- so `sort` followed by
//! `limit(k)` still sorts the full input but emits only `k` elements.

use crate::stage::StageOp;
use crate::value::Value;
use crate::Stream;
use std::cmp::Ordering;
use std::sync::Arc;

impl Stream {
    /// Swallow the first `n` elements and forward the rest.
    ///
    /// Skipping more elements than the upstream produces yields an empty
    /// stream.
    #[must_use]
    pub fn skip(self, n: usize) -> Stream {
        self.attach(StageOp::Skip(n))
    }

    /// Forward at most `n` elements, then stop the upstream.
    ///
    /// With side-effecting upstream callbacks, at most `n + 1` upstream
    /// invocations happen: the accept that exhausts the budget is the last
    /// one before the source observes the cancellation poll.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline};
    ///
    /// let p = Pipeline::default();
    /// assert_eq!(stream_of!(&p, 1, 2, 3, 4, 5).skip(2).limit(2).count()?, 2);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn limit(self, n: usize) -> Stream {
        self.attach(StageOp::Limit(n))
    }

    /// Buffer the stream and emit it in comparator order.
    ///
    /// The sort is stable: elements the comparator considers equal keep
    /// their input order. The comparator must be a total order over the
    /// values it will see.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline, Value};
    ///
    /// let p = Pipeline::default();
    /// let sorted = stream_of!(&p, 3, 1, 2)
    ///     .sort(|a, b| a.as_int().cmp(&b.as_int()))
    ///     .collect()?;
    /// assert_eq!(sorted, vec![Value::from(1), Value::from(2), Value::from(3)]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn sort<F>(self, cmp: F) -> Stream
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.attach(StageOp::Sort(Arc::new(cmp)))
    }
}

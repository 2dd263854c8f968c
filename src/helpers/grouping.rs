//! Grouping and the parallel marker: [`Stream::group_by`] and
//! [`Stream::parallel`].

use crate::stage::StageOp;
use crate::value::Value;
use crate::Stream;
use std::sync::Arc;

impl Stream {
    /// Bucket elements by a projected key and collapse the stream to a
    /// single [`Value::Map`] of key -> [`Value::List`] of members.
    ///
    /// The stream stays chainable after `group_by`, but downstream stages
    /// see exactly one element: the whole mapping. The iteration order of
    /// the output pairs is unspecified.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline, Value};
    ///
    /// let p = Pipeline::default();
    /// let groups = stream_of!(&p, 1, 2, 3, 4)
    ///     .group_by(|v| Value::from(v.as_int().unwrap_or(0) % 2))
    ///     .first()?
    ///     .expect("one mapping element");
    /// let evens = groups.get(&Value::from(0)).and_then(|g| g.as_list());
    /// assert_eq!(evens.map(<[Value]>::len), Some(2));
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn group_by<F>(self, key: F) -> Stream
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.attach(StageOp::Group(Arc::new(key)))
    }

    /// Switch the drive loop to the fan-out strategy.
    ///
    /// The marker forwards elements unchanged; its effect is that the
    /// terminal drive dispatches `accept` calls across a worker pool.
    /// Encounter order is no longer preserved: `first`/`last` return
    /// any-one/any-final element, and order-sensitive stages downstream see
    /// elements in unspecified order. `sort` remains deterministic because
    /// it buffers and replays sequentially at end-of-stream.
    #[must_use]
    pub fn parallel(self) -> Stream {
        self.attach(StageOp::Parallel)
    }
}

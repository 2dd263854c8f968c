//! Common elementwise transforms for [`Stream`].
//!
//! This module defines the core functional operators of the engine:
//!
//! - [`Stream::map`] -- one-to-one element transformation.
//! - [`Stream::filter`] -- element selection by predicate.
//! - [`Stream::flat_map`] -- one-to-many expansion.
//!
//! All three are lazy: they attach a stage description to the pipeline and
//! return a new tail handle. Nothing runs until a terminal operation drives
//! the chain. With a `limit` downstream, `map` and `flat_map` callbacks run
//! at most once more than the number of elements the limit lets through.

use crate::stage::StageOp;
use crate::value::Value;
use crate::Stream;
use std::sync::Arc;

impl Stream {
    /// Apply a function to each element of the stream.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline, Value};
    ///
    /// let p = Pipeline::default();
    /// let squares = stream_of!(&p, 1, 2, 3)
    ///     .map(|v| Value::from(v.as_int().unwrap_or(0).pow(2)))
    ///     .collect()?;
    /// assert_eq!(squares, vec![Value::from(1), Value::from(4), Value::from(9)]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn map<F>(self, f: F) -> Stream
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.attach(StageOp::Map(Arc::new(f)))
    }

    /// Retain only elements that satisfy the given predicate.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline};
    ///
    /// let p = Pipeline::default();
    /// let evens = stream_of!(&p, 1, 2, 3, 4, 5)
    ///     .filter(|v| v.as_int().is_some_and(|n| n % 2 == 0))
    ///     .count()?;
    /// assert_eq!(evens, 2);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn filter<F>(self, pred: F) -> Stream
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.attach(StageOp::Filter(Arc::new(pred)))
    }

    /// Apply a one-to-many transformation, expanding each element into zero
    /// or more outputs, concatenated in order.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline, Value};
    ///
    /// let p = Pipeline::default();
    /// let doubled = stream_of!(&p, 1, 2)
    ///     .flat_map(|v| vec![v.clone(), v.clone()])
    ///     .collect()?;
    /// assert_eq!(doubled.len(), 4);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn flat_map<F>(self, f: F) -> Stream
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        self.attach(StageOp::FlatMap(Arc::new(f)))
    }
}

//! Terminal operations: the calls that drive a pipeline and yield results.
//!
//! Every method here closes the chain with a terminal sink, runs the drive
//! loop, and reads the terminal's accumulated state back out. Pipelines are
//! single-use: the first terminal call closes the pipeline and any later
//! one fails with [`StreamError::PipelineClosed`](crate::StreamError::PipelineClosed).
//!
//! Absent results (`first`/`last`/`max`/`min` over an empty stream) are
//! `None`; [`Value::Null`] never stands in for them.

use crate::runner::drive;
use crate::terminal::{TerminalOp, TerminalOut};
use crate::value::Value;
use crate::Stream;
use anyhow::{anyhow, Result};
use std::cmp::Ordering;
use std::sync::Arc;

impl Stream {
    /// Invoke `f` on every element, in encounter order in sequential mode.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn for_each<F>(self, f: F) -> Result<()>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        match drive(&self.pipeline, self.id, TerminalOp::ForEach(Arc::new(f)))? {
            TerminalOut::Unit => Ok(()),
            _ => Err(anyhow!("for_each terminal produced a foreign result")),
        }
    }

    /// Materialise the stream into an ordered list.
    ///
    /// With no intermediate stages this returns the source buffer as-is.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn collect(self) -> Result<Vec<Value>> {
        match drive(&self.pipeline, self.id, TerminalOp::Collect)? {
            TerminalOut::Values(v) => Ok(v),
            _ => Err(anyhow!("collect terminal produced a foreign result")),
        }
    }

    /// Count the elements reaching the end of the chain.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn count(self) -> Result<usize> {
        match drive(&self.pipeline, self.id, TerminalOp::Count)? {
            TerminalOut::Count(n) => Ok(n),
            _ => Err(anyhow!("count terminal produced a foreign result")),
        }
    }

    /// The maximum element under `cmp`, or `None` for an empty stream.
    ///
    /// Later elements replace the current maximum only when strictly
    /// greater, so among equals the earliest wins.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn max<F>(self, cmp: F) -> Result<Option<Value>>
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        match drive(&self.pipeline, self.id, TerminalOp::Max(Arc::new(cmp)))? {
            TerminalOut::Single(v) => Ok(v),
            _ => Err(anyhow!("max terminal produced a foreign result")),
        }
    }

    /// The minimum element under `cmp`, or `None` for an empty stream.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn min<F>(self, cmp: F) -> Result<Option<Value>>
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        match drive(&self.pipeline, self.id, TerminalOp::Min(Arc::new(cmp)))? {
            TerminalOut::Single(v) => Ok(v),
            _ => Err(anyhow!("min terminal produced a foreign result")),
        }
    }

    /// The first element, or `None` for an empty stream.
    ///
    /// Short-circuits: after one element is stored the source stops
    /// pushing. Under a parallel marker this is any-one element.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn first(self) -> Result<Option<Value>> {
        match drive(&self.pipeline, self.id, TerminalOp::First)? {
            TerminalOut::Single(v) => Ok(v),
            _ => Err(anyhow!("first terminal produced a foreign result")),
        }
    }

    /// The final element, or `None` for an empty stream.
    ///
    /// Under a parallel marker this is any-final element.
    ///
    /// # Errors
    /// Fails when the pipeline has already driven.
    pub fn last(self) -> Result<Option<Value>> {
        match drive(&self.pipeline, self.id, TerminalOp::Last)? {
            TerminalOut::Single(v) => Ok(v),
            _ => Err(anyhow!("last terminal produced a foreign result")),
        }
    }

    /// Collect every element into a batch and reduce it with `f`.
    ///
    /// The reducer is invoked exactly once at end-of-stream, even when the
    /// batch is empty; its error, if any, is the return of `reduce`.
    ///
    /// # Example
    /// ```
    /// use rillflow::{stream_of, Pipeline, Value};
    ///
    /// let p = Pipeline::default();
    /// let sum = stream_of!(&p, 1, 2, 3).reduce(|batch| {
    ///     Ok(Value::from(
    ///         batch.iter().filter_map(|v| v.as_int()).sum::<i64>(),
    ///     ))
    /// })?;
    /// assert_eq!(sum, Value::from(6));
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// Fails when the pipeline has already driven, or with the reducer's
    /// own error.
    pub fn reduce<F>(self, f: F) -> Result<Value>
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        match drive(&self.pipeline, self.id, TerminalOp::Reduce(Arc::new(f)))? {
            TerminalOut::Reduced(r) => r,
            _ => Err(anyhow!("reduce terminal produced a foreign result")),
        }
    }
}

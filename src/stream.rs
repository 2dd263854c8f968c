//! The stream handle and source constructors.
//!
//! This module defines:
//!
//! - [`Stream`]: the handle callers chain operators on. It refers to the
//!   tail stage of a pipeline chain; transform methods (in `helpers/*`)
//!   create new `Stream`s by attaching stages, and terminal methods drive
//!   the pipeline.
//! - Sources: [`from_vec`] (the typed fast path), [`from_collection`] (the
//!   dynamic adapter over a [`Value`]), and the [`stream_of!`](crate::stream_of)
//!   varargs convenience macro.
//!
//! A `Stream` is cheap to clone--clones share the pipeline arena--but the
//! pipeline underneath is single-use: after one terminal operation has
//! driven it, any further terminal call fails with
//! [`StreamError::PipelineClosed`](crate::StreamError::PipelineClosed).

use crate::error::StreamError;
use crate::pipeline::Pipeline;
use crate::stage::StageOp;
use crate::value::Value;
use crate::StageId;
use anyhow::Result;

/// A handle to the tail stage of a pipeline chain.
///
/// # Example
/// ```
/// use rillflow::{from_vec, Pipeline, Value};
///
/// let p = Pipeline::default();
/// let out = from_vec(&p, vec![Value::from(1), Value::from(2), Value::from(3)])
///     .map(|v| Value::from(v.as_int().unwrap_or(0) * 2))
///     .collect()?;
/// assert_eq!(out, vec![Value::from(2), Value::from(4), Value::from(6)]);
/// # anyhow::Result::<()>::Ok(())
/// ```
#[derive(Clone)]
pub struct Stream {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: StageId,
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").field("id", &self.id).finish()
    }
}

impl Stream {
    /// Attach `op` downstream of this stream's tail and return the new tail.
    pub(crate) fn attach(self, op: StageOp) -> Stream {
        let id = self.pipeline.attach_stage(self.id, op);
        Stream {
            pipeline: self.pipeline,
            id,
        }
    }
}

/// Wrap an ordered sequence of values into a source stage on `p`.
///
/// This is the primary entry point; the input buffer is materialised as-is
/// and pushed through the chain when a terminal operation runs.
///
/// # Panics
///
/// Panics if `p` already holds a source stage; a pipeline wraps exactly one
/// input sequence.
#[must_use]
pub fn from_vec(p: &Pipeline, data: Vec<Value>) -> Stream {
    let id = p.insert_source(data);
    Stream {
        pipeline: p.clone(),
        id,
    }
}

/// Wrap a dynamically-typed collection value into a source stage on `p`.
///
/// Accepts only [`Value::List`]; handing any other variant to the source
/// adapter is a programmer error.
///
/// # Example
/// ```
/// use rillflow::{from_collection, Pipeline, Value};
///
/// let p = Pipeline::default();
/// let items = Value::List(vec![Value::from(1), Value::from(2)]);
/// assert_eq!(from_collection(&p, items)?.count()?, 2);
/// # anyhow::Result::<()>::Ok(())
/// ```
///
/// # Errors
///
/// Fails with [`StreamError::NotACollection`] when `v` is not a list.
pub fn from_collection(p: &Pipeline, v: Value) -> Result<Stream> {
    match v {
        Value::List(items) => Ok(from_vec(p, items)),
        other => Err(StreamError::NotACollection {
            found: other.kind(),
        }
        .into()),
    }
}

/// Wrap a fixed argument list into a source stage: the varargs form of
/// [`from_vec`]. Each argument is converted with `Into<Value>`.
///
/// # Example
/// ```
/// use rillflow::{stream_of, Pipeline};
///
/// let p = Pipeline::default();
/// let n = stream_of!(&p, 3, 1, 2).count()?;
/// assert_eq!(n, 3);
/// # anyhow::Result::<()>::Ok(())
/// ```
#[macro_export]
macro_rules! stream_of {
    ($p:expr $(, $item:expr)* $(,)?) => {
        $crate::from_vec($p, vec![$($crate::Value::from($item)),*])
    };
}

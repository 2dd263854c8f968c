//! Stage descriptions and user callback signatures.
//!
//! A pipeline is built eagerly as a chain of [`StageOp`]s registered in the
//! [`Pipeline`](crate::pipeline::Pipeline) arena, and evaluated lazily when a
//! terminal operation drives it. `StageOp` is purely descriptive: the runner
//! turns each op into a live sink when the drive starts.
//!
//! User callbacks are stored as `Arc`'d trait objects so stage descriptions
//! stay cheap to move between the arena and the runner, and so the same
//! closure can be invoked from worker threads in parallel mode.

use crate::value::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// Element predicate used by `filter`.
pub type FilterFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// One-to-one element transform used by `map`.
pub type MapFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// One-to-many element transform used by `flat_map`.
pub type FlatMapFn = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;

/// Per-element callback used by `for_each`.
pub type ForEachFn = Arc<dyn Fn(&Value) + Send + Sync>;

/// Key projection used by `distinct_by` and `group_by`. The projected key
/// participates in the engine's structural equality.
pub type KeyFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Two-element comparator used by `sort`, `max`, and `min`.
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Batch reducer used by `reduce`. Invoked exactly once at the end of the
/// stream with every accepted element, even when the stream was empty.
pub type ReduceFn = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Description of a single pipeline stage.
///
/// `Source` holds the materialised input buffer; every other variant holds
/// the state its sink needs at construction time (callbacks and counters).
#[derive(Clone)]
pub enum StageOp {
    /// Head of the chain: the materialised input sequence.
    Source(Vec<Value>),
    /// Drop elements failing the predicate.
    Filter(FilterFn),
    /// Transform each element.
    Map(MapFn),
    /// Expand each element into zero or more elements.
    FlatMap(FlatMapFn),
    /// Forward only the first occurrence of each element.
    Distinct,
    /// Forward only the first element per projected key.
    DistinctBy(KeyFn),
    /// Swallow the first `n` elements.
    Skip(usize),
    /// Forward at most `n` elements, then request cancellation.
    Limit(usize),
    /// Buffer everything, stable-sort at end-of-stream, replay downstream.
    Sort(CompareFn),
    /// Buffer into key buckets, emit the whole mapping as one element.
    Group(KeyFn),
    /// Pass-through marker that switches the drive loop to the fan-out
    /// strategy.
    Parallel,
}

impl StageOp {
    /// Short operator name, for diagnostics and debug logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StageOp::Source(_) => "source",
            StageOp::Filter(_) => "filter",
            StageOp::Map(_) => "map",
            StageOp::FlatMap(_) => "flat_map",
            StageOp::Distinct => "distinct",
            StageOp::DistinctBy(_) => "distinct_by",
            StageOp::Skip(_) => "skip",
            StageOp::Limit(_) => "limit",
            StageOp::Sort(_) => "sort",
            StageOp::Group(_) => "group",
            StageOp::Parallel => "parallel",
        }
    }
}

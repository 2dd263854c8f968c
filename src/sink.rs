//! The push protocol linking adjacent stages, and the intermediate sinks.
//!
//! Every live stage implements [`Sink`], the four-message contract data is
//! pushed through:
//!
//! - `begin(size)` announces that data is about to flow; `size` is the
//!   source element count, or `None` once a size-changing stage upstream has
//!   made the count unknowable. Stages may pre-size buffers from it.
//! - `accept(value)` delivers one element; a stage forwards zero, one, or
//!   many elements downstream.
//! - `end()` closes the stream; stateful stages flush buffered output here
//!   and then propagate.
//! - `cancellation_requested()` reports, without side effects, that this
//!   stage or anything downstream can take no further input. The drive loop
//!   polls it after every `accept`, and buffering stages poll it while
//!   replaying at `end`.
//!
//! Short-circuiting therefore flows upstream purely by polling: a stage
//! that is done (limit after its budget, first after one element) answers
//! `true` forever, every intermediate forwards its downstream's answer, and
//! the source stops pushing.

use crate::stage::{CompareFn, FilterFn, FlatMapFn, KeyFn, MapFn, StageOp};
use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// The four-message push contract between adjacent stages.
///
/// Implementations must uphold the framing invariant: exactly one `begin`
/// before any `accept`, exactly one `end` after the last.
pub trait Sink: Send {
    /// Data is about to flow; `size` is the element count when still known.
    fn begin(&mut self, size: Option<usize>);
    /// Deliver one element.
    fn accept(&mut self, value: Value);
    /// No more elements; flush buffered output and propagate.
    fn end(&mut self);
    /// Whether this stage or anything downstream is done taking input.
    fn cancellation_requested(&self) -> bool;
}

/// Build the live sink for one stage description, wired to `next`.
///
/// `Source` never reaches this point; the runner holds it apart as the
/// drive loop.
pub(crate) fn build_sink(op: StageOp, next: Box<dyn Sink>) -> Box<dyn Sink> {
    match op {
        StageOp::Source(_) => unreachable!("source stages are driven, not built as sinks"),
        StageOp::Filter(pred) => Box::new(FilterSink { pred, next }),
        StageOp::Map(f) => Box::new(MapSink { f, next }),
        StageOp::FlatMap(f) => Box::new(FlatMapSink { f, next }),
        StageOp::Distinct => Box::new(DistinctSink {
            seen: HashSet::new(),
            next,
        }),
        StageOp::DistinctBy(key) => Box::new(DistinctBySink {
            key,
            seen: HashSet::new(),
            next,
        }),
        StageOp::Skip(n) => Box::new(SkipSink { n, seen: 0, next }),
        StageOp::Limit(n) => Box::new(LimitSink { n, taken: 0, next }),
        StageOp::Sort(cmp) => Box::new(SortSink {
            cmp,
            buf: Vec::new(),
            next,
        }),
        StageOp::Group(key) => Box::new(GroupSink {
            key,
            order: Vec::new(),
            groups: HashMap::new(),
            next,
        }),
        StageOp::Parallel => Box::new(PassThroughSink { next }),
    }
}

/// Drops elements failing the predicate. The size hint is no longer
/// accurate downstream.
struct FilterSink {
    pred: FilterFn,
    next: Box<dyn Sink>,
}

impl Sink for FilterSink {
    fn begin(&mut self, _size: Option<usize>) {
        self.next.begin(None);
    }

    fn accept(&mut self, value: Value) {
        if (self.pred)(&value) {
            self.next.accept(value);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// One-to-one transform; element count is preserved, so the hint passes
/// through unchanged.
struct MapSink {
    f: MapFn,
    next: Box<dyn Sink>,
}

impl Sink for MapSink {
    fn begin(&mut self, size: Option<usize>) {
        self.next.begin(size);
    }

    fn accept(&mut self, value: Value) {
        self.next.accept((self.f)(&value));
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// One-to-many expansion. Stops mid-batch as soon as the downstream
/// requests cancellation.
struct FlatMapSink {
    f: FlatMapFn,
    next: Box<dyn Sink>,
}

impl Sink for FlatMapSink {
    fn begin(&mut self, _size: Option<usize>) {
        self.next.begin(None);
    }

    fn accept(&mut self, value: Value) {
        for item in (self.f)(&value) {
            if self.next.cancellation_requested() {
                break;
            }
            self.next.accept(item);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// Forwards only the first occurrence of each element, by the engine's
/// structural equality.
struct DistinctSink {
    seen: HashSet<Value>,
    next: Box<dyn Sink>,
}

impl Sink for DistinctSink {
    fn begin(&mut self, _size: Option<usize>) {
        self.next.begin(None);
    }

    fn accept(&mut self, value: Value) {
        if self.seen.insert(value.clone()) {
            self.next.accept(value);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// Like [`DistinctSink`] but equality is defined on a projected key.
struct DistinctBySink {
    key: KeyFn,
    seen: HashSet<Value>,
    next: Box<dyn Sink>,
}

impl Sink for DistinctBySink {
    fn begin(&mut self, _size: Option<usize>) {
        self.next.begin(None);
    }

    fn accept(&mut self, value: Value) {
        if self.seen.insert((self.key)(&value)) {
            self.next.accept(value);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// Swallows the first `n` elements; the hint shrinks accordingly.
struct SkipSink {
    n: usize,
    seen: usize,
    next: Box<dyn Sink>,
}

impl Sink for SkipSink {
    fn begin(&mut self, size: Option<usize>) {
        self.next.begin(size.map(|s| s.saturating_sub(self.n)));
    }

    fn accept(&mut self, value: Value) {
        self.seen += 1;
        if self.seen > self.n {
            self.next.accept(value);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

/// Forwards at most `n` elements, then answers the cancellation poll with
/// `true` forever so the source stops pushing.
struct LimitSink {
    n: usize,
    taken: usize,
    next: Box<dyn Sink>,
}

impl Sink for LimitSink {
    fn begin(&mut self, size: Option<usize>) {
        self.next.begin(size.map(|s| s.min(self.n)));
    }

    fn accept(&mut self, value: Value) {
        if self.taken < self.n {
            self.taken += 1;
            self.next.accept(value);
        }
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.taken >= self.n || self.next.cancellation_requested()
    }
}

/// Buffers every element and replays the stable-sorted buffer downstream at
/// end-of-stream, with its own `begin`/`end` framing. Cancellation is
/// honoured mid-replay, so a downstream limit stops the emission without
/// stopping the sort itself.
struct SortSink {
    cmp: CompareFn,
    buf: Vec<Value>,
    next: Box<dyn Sink>,
}

impl Sink for SortSink {
    fn begin(&mut self, size: Option<usize>) {
        if let Some(s) = size {
            self.buf.reserve(s);
        }
    }

    fn accept(&mut self, value: Value) {
        self.buf.push(value);
    }

    fn end(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        // Vec::sort_by is stable: equal elements keep their input order.
        buf.sort_by(|a, b| (self.cmp)(a, b));
        self.next.begin(Some(buf.len()));
        for item in buf {
            if self.next.cancellation_requested() {
                break;
            }
            self.next.accept(item);
        }
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        // The buffer takes everything; downstream is only consulted during
        // the replay in end().
        false
    }
}

/// Buffers elements into per-key buckets and emits the whole mapping as a
/// single `Value::Map` of key -> `Value::List`. The stream collapses to one
/// element; bucket order is first-occurrence but carries no contract.
struct GroupSink {
    key: KeyFn,
    order: Vec<Value>,
    groups: HashMap<Value, Vec<Value>>,
    next: Box<dyn Sink>,
}

impl Sink for GroupSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, value: Value) {
        let key = (self.key)(&value);
        match self.groups.get_mut(&key) {
            Some(bucket) => bucket.push(value),
            None => {
                self.order.push(key.clone());
                self.groups.insert(key, vec![value]);
            }
        }
    }

    fn end(&mut self) {
        let mut pairs = Vec::with_capacity(self.order.len());
        for key in self.order.drain(..) {
            let bucket = self.groups.remove(&key).unwrap_or_default();
            pairs.push((key, Value::List(bucket)));
        }
        self.next.begin(Some(1));
        if !self.next.cancellation_requested() {
            self.next.accept(Value::Map(pairs));
        }
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// The `Parallel` marker stage at run time: forwards everything unchanged.
/// Its effect (switching the drive strategy) was latched at attach time.
struct PassThroughSink {
    next: Box<dyn Sink>,
}

impl Sink for PassThroughSink {
    fn begin(&mut self, size: Option<usize>) {
        self.next.begin(size);
    }

    fn accept(&mut self, value: Value) {
        self.next.accept(value);
    }

    fn end(&mut self) {
        self.next.end();
    }

    fn cancellation_requested(&self) -> bool {
        self.next.cancellation_requested()
    }
}

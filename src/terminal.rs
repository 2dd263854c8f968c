//! Terminal sinks: the tail stage each terminal operation appends.
//!
//! A terminal sink accumulates state during `accept` and publishes its
//! result into a shared out-slot at `end`. The runner hands the slot to the
//! terminal at construction and reads it back once the drive completes;
//! sharing (rather than downcasting the chain) keeps the readout uniform
//! across sequential and parallel drives, where the chain itself moves
//! behind a mutex.

use crate::sink::Sink;
use crate::stage::{CompareFn, ForEachFn, ReduceFn};
use crate::value::Value;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

/// Description of the terminal operation closing a pipeline.
#[derive(Clone)]
pub(crate) enum TerminalOp {
    ForEach(ForEachFn),
    Collect,
    Count,
    Max(CompareFn),
    Min(CompareFn),
    First,
    Last,
    Reduce(ReduceFn),
}

impl TerminalOp {
    /// Short operator name, for diagnostics and debug logging.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            TerminalOp::ForEach(_) => "for_each",
            TerminalOp::Collect => "collect",
            TerminalOp::Count => "count",
            TerminalOp::Max(_) => "max",
            TerminalOp::Min(_) => "min",
            TerminalOp::First => "first",
            TerminalOp::Last => "last",
            TerminalOp::Reduce(_) => "reduce",
        }
    }
}

/// The accumulated result of a terminal stage, published at `end`.
pub(crate) enum TerminalOut {
    Unit,
    Values(Vec<Value>),
    Count(usize),
    Single(Option<Value>),
    Reduced(anyhow::Result<Value>),
}

/// Shared slot the terminal sink writes its result into.
pub(crate) type TerminalSlot = Arc<Mutex<Option<TerminalOut>>>;

/// Build the live terminal sink for `op`, publishing into `slot`.
pub(crate) fn build_terminal(op: TerminalOp, slot: TerminalSlot) -> Box<dyn Sink> {
    match op {
        TerminalOp::ForEach(f) => Box::new(ForEachSink { f, slot }),
        TerminalOp::Collect => Box::new(CollectSink {
            buf: Vec::new(),
            slot,
        }),
        TerminalOp::Count => Box::new(CountSink { count: 0, slot }),
        TerminalOp::Max(cmp) => Box::new(ExtremumSink {
            cmp,
            keep: Ordering::Greater,
            current: None,
            slot,
        }),
        TerminalOp::Min(cmp) => Box::new(ExtremumSink {
            cmp,
            keep: Ordering::Less,
            current: None,
            slot,
        }),
        TerminalOp::First => Box::new(FirstSink { val: None, slot }),
        TerminalOp::Last => Box::new(LastSink { val: None, slot }),
        TerminalOp::Reduce(f) => Box::new(ReduceSink {
            f,
            buf: Vec::new(),
            slot,
        }),
    }
}

fn publish(slot: &TerminalSlot, out: TerminalOut) {
    *slot.lock().unwrap() = Some(out);
}

/// Invokes the callback on every element; produces no result.
struct ForEachSink {
    f: ForEachFn,
    slot: TerminalSlot,
}

impl Sink for ForEachSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, value: Value) {
        (self.f)(&value);
    }

    fn end(&mut self) {
        publish(&self.slot, TerminalOut::Unit);
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Appends every element to an ordered list.
struct CollectSink {
    buf: Vec<Value>,
    slot: TerminalSlot,
}

impl Sink for CollectSink {
    fn begin(&mut self, size: Option<usize>) {
        if let Some(s) = size {
            self.buf.reserve(s);
        }
    }

    fn accept(&mut self, value: Value) {
        self.buf.push(value);
    }

    fn end(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        publish(&self.slot, TerminalOut::Values(buf));
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Counts accepted elements.
struct CountSink {
    count: usize,
    slot: TerminalSlot,
}

impl Sink for CountSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, _value: Value) {
        self.count += 1;
    }

    fn end(&mut self) {
        publish(&self.slot, TerminalOut::Count(self.count));
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Tracks the current extremum: the first element seeds it, later elements
/// replace it when the comparator answers `keep` (strictly greater for max,
/// strictly less for min). Empty input publishes `None`.
struct ExtremumSink {
    cmp: CompareFn,
    keep: Ordering,
    current: Option<Value>,
    slot: TerminalSlot,
}

impl Sink for ExtremumSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, value: Value) {
        match &self.current {
            None => self.current = Some(value),
            Some(cur) => {
                if (self.cmp)(&value, cur) == self.keep {
                    self.current = Some(value);
                }
            }
        }
    }

    fn end(&mut self) {
        publish(&self.slot, TerminalOut::Single(self.current.take()));
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Stores the first accepted element and then requests cancellation so the
/// source stops pushing.
struct FirstSink {
    val: Option<Value>,
    slot: TerminalSlot,
}

impl Sink for FirstSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, value: Value) {
        if self.val.is_none() {
            self.val = Some(value);
        }
    }

    fn end(&mut self) {
        publish(&self.slot, TerminalOut::Single(self.val.take()));
    }

    fn cancellation_requested(&self) -> bool {
        self.val.is_some()
    }
}

/// Overwrites its slot on every accept; the final overwrite wins.
struct LastSink {
    val: Option<Value>,
    slot: TerminalSlot,
}

impl Sink for LastSink {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, value: Value) {
        self.val = Some(value);
    }

    fn end(&mut self) {
        publish(&self.slot, TerminalOut::Single(self.val.take()));
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

/// Buffers every element and invokes the reducer exactly once at `end`,
/// even when nothing was accepted.
struct ReduceSink {
    f: ReduceFn,
    buf: Vec<Value>,
    slot: TerminalSlot,
}

impl Sink for ReduceSink {
    fn begin(&mut self, size: Option<usize>) {
        if let Some(s) = size {
            self.buf.reserve(s);
        }
    }

    fn accept(&mut self, value: Value) {
        self.buf.push(value);
    }

    fn end(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        publish(&self.slot, TerminalOut::Reduced((self.f)(&buf)));
    }

    fn cancellation_requested(&self) -> bool {
        false
    }
}

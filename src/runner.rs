//! Execution engine.
//!
//! `drive` evaluates a pipeline: it extracts the linear stage chain from the
//! [`Pipeline`](crate::Pipeline) arena (closing it), builds the live sink
//! chain from the terminal backwards, and then pushes the source buffer
//! through it. Two strategies exist:
//!
//! - **Sequential** (the default) pushes elements in ascending index order
//!   on the calling thread, polling `cancellation_requested` after every
//!   `accept` and breaking out as soon as a downstream stage is done.
//! - **Parallel** (opted into with a `Parallel` marker stage) fans the
//!   `accept` calls out across a dedicated rayon pool built for the drive
//!   and torn down after `end`. The sink chain is serialised behind a
//!   single mutex and a latch stops further dispatch once cancellation is
//!   observed. Encounter order is not preserved in this mode.
//!
//! In both strategies the framing is identical: one `begin(size)` before
//! any element, one `end()` afterwards, both on the calling thread.

use crate::pipeline::Pipeline;
use crate::sink::{build_sink, Sink};
use crate::stage::StageOp;
use crate::terminal::{build_terminal, TerminalOp, TerminalOut, TerminalSlot};
use crate::value::Value;
use crate::StageId;
use anyhow::{anyhow, Result};
use log::{debug, trace};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Drive the pipeline ending at `tail` with the given terminal operation
/// and return the terminal's accumulated result.
///
/// # Errors
///
/// Fails with [`StreamError::PipelineClosed`](crate::StreamError::PipelineClosed)
/// when the pipeline has already driven, or with an internal error when the
/// chain is malformed.
pub(crate) fn drive(p: &Pipeline, tail: StageId, term: TerminalOp) -> Result<TerminalOut> {
    let (data, ops, parallel) = p.take_plan(tail)?;
    let names: Vec<&str> = ops.iter().map(StageOp::name).collect();
    debug!(
        "driving pipeline: {} elements, stages=[{}] -> {}, parallel={}",
        data.len(),
        names.join(", "),
        term.name(),
        parallel
    );

    let slot: TerminalSlot = Arc::new(Mutex::new(None));
    let mut chain: Box<dyn Sink> = build_terminal(term, Arc::clone(&slot));
    for op in ops.into_iter().rev() {
        chain = build_sink(op, chain);
    }

    if parallel {
        drive_par(data, chain);
    } else {
        drive_seq(data, chain);
    }

    let out = slot.lock().unwrap().take();
    out.ok_or_else(|| anyhow!("terminal stage published no result"))
}

/// Push every element through the chain on the calling thread.
fn drive_seq(data: Vec<Value>, mut chain: Box<dyn Sink>) {
    chain.begin(Some(data.len()));
    for value in data {
        chain.accept(value);
        if chain.cancellation_requested() {
            trace!("sequential drive: cancellation requested, stopping early");
            break;
        }
    }
    chain.end();
}

/// Fan element dispatch out across a worker pool scoped to this drive.
///
/// Workers contend on one mutex around the whole chain, which is the
/// serialisation stages with shared mutable state need under concurrent
/// `accept`. The `begin`/`end` framing stays on the calling thread.
fn drive_par(data: Vec<Value>, mut chain: Box<dyn Sink>) {
    let workers = num_cpus::get().max(2);
    trace!("parallel drive: {} workers for {} elements", workers, data.len());

    chain.begin(Some(data.len()));

    let cancelled = AtomicBool::new(false);
    let shared = Mutex::new(chain);
    let run = || {
        data.into_par_iter().for_each(|value| {
            if cancelled.load(Ordering::Relaxed) {
                return;
            }
            let mut sink = shared.lock().unwrap();
            sink.accept(value);
            if sink.cancellation_requested() {
                cancelled.store(true, Ordering::Relaxed);
            }
        });
    };

    // Pool lives for this drive only. Fall back to the global pool if the
    // dedicated one cannot be built (thread exhaustion).
    match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(run),
        Err(_) => run(),
    }

    let mut chain = shared.into_inner().unwrap();
    chain.end();
}

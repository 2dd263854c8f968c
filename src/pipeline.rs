//! In-memory representation of a stream pipeline chain.
//!
//! The [`Pipeline`] acts as the central registry for all stages
//! ([`StageOp`]) and their downstream links. It is lightweight, cloneable,
//! and thread-safe via internal `Arc<Mutex<_>>` wrapping, allowing every
//! [`Stream`](crate::Stream) handle derived from it to share one arena.
//!
//! # Overview
//! - The source constructor inserts exactly one `Source` stage.
//! - Each chaining call on a [`Stream`](crate::Stream) attaches a new stage
//!   to the tail via [`Pipeline::attach_stage`], which records the
//!   downstream link and inherits the pipeline-wide parallel flag.
//! - A terminal operation extracts the whole chain with `take_plan` and
//!   marks the pipeline closed; a second drive fails.
//!
//! The chain is intentionally linear--each stage has at most one
//! downstream, no branches, no cycles--so extraction is a simple walk from
//! the source.

use crate::error::StreamError;
use crate::stage::StageOp;
use crate::value::Value;
use crate::StageId;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Thread-safe registry holding the stages of one pipeline.
///
/// Each pipeline is essentially a shared, linear chain:
/// ```text
///  Source -> Filter -> Map -> Sort -> (terminal)
/// ```
///
/// The `Pipeline` itself is cheaply cloneable; all clones share the same
/// underlying `PipelineInner`. The shared handle is also the back-reference
/// every stage keeps to its source: a `Stream` carries the pipeline plus the
/// id of its tail stage, and the source is always reachable through the
/// arena.
pub struct Pipeline {
    /// Shared reference to the internal chain data.
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
}

/// One slot in the stage arena: the stage description plus its downstream
/// link, set when the next stage is attached.
pub(crate) struct StageSlot {
    pub op: StageOp,
    pub downstream: Option<StageId>,
}

/// Inner mutable state for a [`Pipeline`].
///
/// Tracks:
/// - `next_id`: incremental counter for stage IDs.
/// - `stages`: map of [`StageId`] -> [`StageSlot`].
/// - `source`: the head of the chain, set by the first source constructor.
/// - `parallel`: latched when a `Parallel` marker stage is attached.
/// - `closed`: latched when a terminal operation drives the pipeline.
pub(crate) struct PipelineInner {
    pub next_id: u64,
    pub stages: HashMap<StageId, StageSlot>,
    pub source: Option<StageId>,
    pub parallel: bool,
    pub closed: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                stages: HashMap::new(),
                source: None,
                parallel: false,
                closed: false,
            })),
        }
    }
}

impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Pipeline {
    /// Insert the source stage holding the materialised input.
    ///
    /// # Panics
    ///
    /// Panics if the pipeline already has a source; a pipeline wraps exactly
    /// one input sequence.
    pub(crate) fn insert_source(&self, data: Vec<Value>) -> StageId {
        let mut g = self.inner.lock().unwrap();
        assert!(
            g.source.is_none(),
            "pipeline already has a source stage; create a new Pipeline per input"
        );
        let id = StageId::new(g.next_id);
        g.next_id += 1;
        g.stages.insert(
            id,
            StageSlot {
                op: StageOp::Source(data),
                downstream: None,
            },
        );
        g.source = Some(id);
        id
    }

    /// Attach a new stage downstream of `parent` and return its id.
    ///
    /// Centralises the chaining policy: the new stage joins the same arena
    /// (and therefore shares the source back-reference), and attaching a
    /// `Parallel` marker latches the pipeline-wide parallel flag.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is unknown or already has a downstream; the chain
    /// is linear and branching is a programmer error.
    pub(crate) fn attach_stage(&self, parent: StageId, op: StageOp) -> StageId {
        let mut g = self.inner.lock().unwrap();
        if matches!(op, StageOp::Parallel) {
            g.parallel = true;
        }
        let id = StageId::new(g.next_id);
        g.next_id += 1;
        g.stages.insert(
            id,
            StageSlot {
                op,
                downstream: None,
            },
        );
        let parent_slot = g
            .stages
            .get_mut(&parent)
            .expect("attach_stage: unknown parent stage");
        assert!(
            parent_slot.downstream.is_none(),
            "stage already has a downstream; pipelines do not branch"
        );
        parent_slot.downstream = Some(id);
        id
    }

    /// Extract the executable plan ending at `tail` and close the pipeline.
    ///
    /// Returns the source buffer, the intermediate ops in source-to-tail
    /// order, and whether a parallel marker was attached. The stages are
    /// moved out of the arena; the pipeline is spent afterwards.
    ///
    /// # Errors
    ///
    /// Fails with [`StreamError::PipelineClosed`] when the pipeline has
    /// already driven, or with an internal error when `tail` is not
    /// reachable from the source (which indicates a builder bug).
    pub(crate) fn take_plan(&self, tail: StageId) -> Result<(Vec<Value>, Vec<StageOp>, bool)> {
        let mut g = self.inner.lock().unwrap();
        if g.closed {
            return Err(StreamError::PipelineClosed.into());
        }
        g.closed = true;

        let source_id = g
            .source
            .ok_or_else(|| anyhow!("pipeline has no source stage"))?;
        let mut slot = g
            .stages
            .remove(&source_id)
            .ok_or_else(|| anyhow!("source stage missing from arena"))?;
        let data = match slot.op {
            StageOp::Source(data) => data,
            _ => return Err(anyhow!("head stage is not a source")),
        };

        let mut ops = Vec::new();
        let mut reached_tail = source_id == tail;
        while let Some(next) = slot.downstream {
            slot = g
                .stages
                .remove(&next)
                .ok_or_else(|| anyhow!("broken downstream link in stage chain"))?;
            ops.push(slot.op);
            if next == tail {
                reached_tail = true;
                break;
            }
        }
        if !reached_tail {
            return Err(anyhow!("terminal stage not reachable from the source"));
        }
        Ok((data, ops, g.parallel))
    }

    /// Number of stages currently registered.
    ///
    /// Useful for verifying that chaining attaches stages correctly.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.inner.lock().unwrap().stages.len()
    }

    /// Whether a terminal operation has already driven this pipeline.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Whether a `Parallel` marker stage has been attached.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.inner.lock().unwrap().parallel
    }
}

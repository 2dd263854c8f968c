//! Error kinds surfaced by the engine.
//!
//! Programmer errors that are reportable at a well-defined call site are
//! expressed as [`StreamError`] values carried through `anyhow::Result`;
//! callers that care about the kind can `downcast_ref::<StreamError>()`.
//! Reducer failures travel as whatever error the reducer returned, and
//! panics in user callbacks are not caught.

use std::fmt;

/// Errors produced by pipeline construction and drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The source adapter was handed a `Value` that is not an ordered
    /// container. Carries the variant name of what was found.
    NotACollection {
        /// `Value::kind()` of the rejected input.
        found: &'static str,
    },
    /// A terminal operation was invoked on a pipeline whose source has
    /// already driven. Pipelines are single-use.
    PipelineClosed,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::NotACollection { found } => {
                write!(f, "source input must be a list value, got {found}")
            }
            StreamError::PipelineClosed => {
                write!(f, "pipeline already driven; streams are single-use")
            }
        }
    }
}

impl std::error::Error for StreamError {}

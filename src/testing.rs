//! Testing utilities for rillflow pipelines.
//!
//! This module provides the pieces tests need to build pipelines tersely
//! and compare their outputs:
//!
//! - [`TestPipeline`]: a thin wrapper over [`Pipeline`] with chain
//!   inspection helpers.
//! - [`ints`] / [`strs`]: value-vector builders for the common literal
//!   shapes.
//! - [`assert_collections_equal`] / [`assert_collections_unordered_equal`]:
//!   collection comparisons with detailed mismatch output.
//!
//! # Quick Start
//!
//! ```
//! use rillflow::from_vec;
//! use rillflow::testing::*;
//!
//! let p = TestPipeline::new();
//! let out = from_vec(&p, ints([1, 2, 3]))
//!     .filter(|v| v.as_int().is_some_and(|n| n > 1))
//!     .collect()
//!     .unwrap();
//! assert_collections_equal(&out, &ints([2, 3]));
//! ```

use crate::{Pipeline, Value};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A test-focused wrapper around [`Pipeline`].
///
/// Behaves exactly like [`Pipeline::default`] and derefs to it, so it can
/// be handed to the source constructors directly.
#[derive(Clone, Default)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    /// Create a new test pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Build a value vector from integer literals.
pub fn ints<I: IntoIterator<Item = i64>>(items: I) -> Vec<Value> {
    items.into_iter().map(Value::from).collect()
}

/// Build a value vector from string literals.
pub fn strs<'a, I: IntoIterator<Item = &'a str>>(items: I) -> Vec<Value> {
    items.into_iter().map(Value::from).collect()
}

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: expected {} elements, got {}\n  expected: {expected:?}\n  actual:   {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "mismatch at index {i}\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

/// Assert that two collections contain the same elements, ignoring order.
///
/// Useful for parallel-mode outputs and other transformations that do not
/// preserve encounter order.
///
/// # Panics
///
/// Panics if the collections differ in content (ignoring order).
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: expected {} elements, got {}\n  expected: {expected:?}\n  actual:   {actual:?}",
        expected.len(),
        actual.len()
    );

    let actual_set: HashSet<_> = actual.iter().collect();
    let expected_set: HashSet<_> = expected.iter().collect();

    if actual_set != expected_set {
        let missing: Vec<_> = expected_set.difference(&actual_set).collect();
        let extra: Vec<_> = actual_set.difference(&expected_set).collect();
        panic!(
            "content mismatch ignoring order\n  missing: {missing:?}\n  extra:   {extra:?}\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

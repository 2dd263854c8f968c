use rillflow::testing::*;
use rillflow::{from_collection, from_vec, stream_of, Pipeline, StreamError, Value};

#[test]
fn driving_twice_fails_with_pipeline_closed() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let stream = stream_of!(&p, 1, 2, 3).map(Clone::clone);

    let first = stream.clone().collect()?;
    assert_eq!(first.len(), 3);
    assert!(p.is_closed());

    let err = stream.collect().unwrap_err();
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::PipelineClosed)
    );
    Ok(())
}

#[test]
fn any_terminal_on_a_closed_pipeline_fails() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let stream = stream_of!(&p, 1, 2, 3);

    stream.clone().count()?;
    let err = stream.first().unwrap_err();
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::PipelineClosed)
    );
    Ok(())
}

#[test]
fn from_collection_accepts_lists() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let items = Value::List(ints([1, 2, 3]));
    let out = from_collection(&p, items)?.collect()?;
    assert_collections_equal(&out, &ints([1, 2, 3]));
    Ok(())
}

#[test]
fn from_collection_rejects_non_lists() {
    let p = Pipeline::default();
    let err = from_collection(&p, Value::from(7)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::NotACollection { found: "int" })
    );
}

#[test]
fn chaining_registers_one_stage_per_operator() {
    let p = TestPipeline::new();
    let _stream = stream_of!(&p, 1, 2, 3)
        .filter(|_| true)
        .map(Clone::clone)
        .limit(2);
    // Source plus three attached stages.
    assert_eq!(p.stage_count(), 4);
    assert!(!p.is_closed());
    assert!(!p.is_parallel());
}

#[test]
fn parallel_marker_latches_the_pipeline_flag() {
    let p = TestPipeline::new();
    let _stream = stream_of!(&p, 1, 2, 3).parallel();
    assert!(p.is_parallel());
}

#[test]
#[should_panic(expected = "already has a source stage")]
fn a_pipeline_wraps_exactly_one_source() {
    let p = Pipeline::default();
    let _a = from_vec(&p, ints([1]));
    let _b = from_vec(&p, ints([2]));
}

#[test]
#[should_panic(expected = "pipelines do not branch")]
fn attaching_two_downstreams_panics() {
    let p = Pipeline::default();
    let stream = from_vec(&p, ints([1, 2, 3]));
    let _left = stream.clone().filter(|_| true);
    let _right = stream.map(Clone::clone);
}

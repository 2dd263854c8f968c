use rillflow::testing::*;
use rillflow::{from_vec, stream_of, Value};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

fn asc_int(a: &Value, b: &Value) -> Ordering {
    a.as_int().cmp(&b.as_int())
}

#[test]
fn for_each_visits_every_element_in_order() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    stream_of!(&p, 1, 2, 3).for_each(move |v| sink.lock().unwrap().push(v.clone()))?;
    assert_collections_equal(&seen.lock().unwrap(), &ints([1, 2, 3]));
    Ok(())
}

#[test]
fn first_and_last_bracket_the_stream() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p, 4, 5, 6).first()?, Some(Value::from(4)));

    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p, 4, 5, 6).last()?, Some(Value::from(6)));
    Ok(())
}

#[test]
fn empty_stream_terminals_return_none() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p).first()?, None);

    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p).last()?, None);

    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p).max(asc_int)?, None);

    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p).min(asc_int)?, None);
    Ok(())
}

#[test]
fn max_and_min_track_extrema() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p, 3, 9, 1, 7).max(asc_int)?, Some(Value::from(9)));

    let p = TestPipeline::new();
    assert_eq!(stream_of!(&p, 3, 9, 1, 7).min(asc_int)?, Some(Value::from(1)));
    Ok(())
}

#[test]
fn max_keeps_the_earliest_of_equals() -> anyhow::Result<()> {
    // Comparator only sees the key; among equal keys the first element must
    // survive because replacement requires strictly greater.
    let pair = |key: i64, tag: &str| Value::List(vec![Value::from(key), Value::from(tag)]);
    let by_key = |a: &Value, b: &Value| {
        let k = |v: &Value| v.as_list().and_then(|l| l[0].as_int());
        k(a).cmp(&k(b))
    };

    let p = TestPipeline::new();
    let winner = from_vec(&p, vec![pair(5, "early"), pair(5, "late"), pair(3, "low")])
        .max(by_key)?;
    assert_eq!(winner, Some(pair(5, "early")));
    Ok(())
}

#[test]
fn reduce_sums_the_batch() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let sum = stream_of!(&p, 1, 2, 3, 4).reduce(|batch| {
        Ok(Value::from(
            batch.iter().filter_map(Value::as_int).sum::<i64>(),
        ))
    })?;
    assert_eq!(sum, Value::from(10));
    Ok(())
}

#[test]
fn reduce_runs_exactly_once_even_on_empty_input() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let out = stream_of!(&p).reduce(move |batch| {
        counter.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Value::from(batch.len() as i64))
    })?;
    assert_eq!(out, Value::from(0));
    assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    Ok(())
}

#[test]
fn reduce_surfaces_the_reducer_error() {
    let p = TestPipeline::new();
    let err = stream_of!(&p, 1, 2)
        .reduce(|_| Err(anyhow::anyhow!("bad batch")))
        .unwrap_err();
    assert!(err.to_string().contains("bad batch"));
}

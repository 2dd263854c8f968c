use rillflow::testing::*;
use rillflow::{from_vec, stream_of, Value};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

fn asc_int(a: &Value, b: &Value) -> Ordering {
    a.as_int().cmp(&b.as_int())
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn parallel_map_reduce_is_order_independent() -> anyhow::Result<()> {
    init_logs();
    let p = TestPipeline::new();
    let sum = stream_of!(&p, 1, 2, 3, 4)
        .parallel()
        .map(|v| Value::from(v.as_int().unwrap_or(0).pow(2)))
        .reduce(|batch| {
            Ok(Value::from(
                batch.iter().filter_map(Value::as_int).sum::<i64>(),
            ))
        })?;
    assert_eq!(sum, Value::from(30));
    Ok(())
}

#[test]
fn parallel_collect_is_a_permutation_of_sequential() -> anyhow::Result<()> {
    init_logs();
    let data = ints(0..1000);

    let p = TestPipeline::new();
    let seq = from_vec(&p, data.clone())
        .map(|v| Value::from(v.as_int().unwrap_or(0) * 3))
        .collect()?;

    let p = TestPipeline::new();
    let par = from_vec(&p, data)
        .parallel()
        .map(|v| Value::from(v.as_int().unwrap_or(0) * 3))
        .collect()?;

    assert_collections_unordered_equal(&par, &seq);
    Ok(())
}

#[test]
fn parallel_count_sees_every_element() -> anyhow::Result<()> {
    init_logs();
    let p = TestPipeline::new();
    let n = from_vec(&p, ints(0..500)).parallel().count()?;
    assert_eq!(n, 500);
    Ok(())
}

#[test]
fn parallel_for_each_visits_every_element_once() -> anyhow::Result<()> {
    init_logs();
    let p = TestPipeline::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    from_vec(&p, ints(0..256)).parallel().for_each(move |_| {
        counter.fetch_add(1, AtomicOrdering::SeqCst);
    })?;
    assert_eq!(calls.load(AtomicOrdering::SeqCst), 256);
    Ok(())
}

#[test]
fn parallel_sort_output_is_deterministic() -> anyhow::Result<()> {
    init_logs();
    let mut data = ints(0..200);
    data.reverse();

    let p = TestPipeline::new();
    let out = from_vec(&p, data).parallel().sort(asc_int).collect()?;
    assert_collections_equal(&out, &ints(0..200));
    Ok(())
}

#[test]
fn parallel_distinct_deduplicates() -> anyhow::Result<()> {
    init_logs();
    let data: Vec<Value> = (0..400i64).map(|n| Value::from(n % 40)).collect();

    let p = TestPipeline::new();
    let n = from_vec(&p, data).parallel().distinct().count()?;
    assert_eq!(n, 40);
    Ok(())
}

#[test]
fn parallel_first_returns_some_input_element() -> anyhow::Result<()> {
    init_logs();
    let p = TestPipeline::new();
    let first = from_vec(&p, ints(0..64)).parallel().first()?;
    let v = first.expect("non-empty stream yields an element");
    assert!(v.as_int().is_some_and(|n| (0..64).contains(&n)));
    Ok(())
}

#[test]
fn parallel_group_by_sees_all_members() -> anyhow::Result<()> {
    init_logs();
    let p = TestPipeline::new();
    let groups = from_vec(&p, ints(0..90))
        .parallel()
        .group_by(|v| Value::from(v.as_int().unwrap_or(0) % 3))
        .first()?
        .expect("grouping emits one mapping");

    for residue in 0..3 {
        let bucket = groups
            .get(&Value::from(residue))
            .and_then(Value::as_list)
            .expect("bucket present");
        assert_eq!(bucket.len(), 30);
    }
    Ok(())
}

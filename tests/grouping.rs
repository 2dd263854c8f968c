use rillflow::testing::*;
use rillflow::{stream_of, Value};

fn parity(v: &Value) -> Value {
    Value::from(v.as_int().unwrap_or(0) % 2)
}

#[test]
fn group_by_buckets_members_in_order() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let groups = stream_of!(&p, 1, 2, 3, 4, 5)
        .group_by(parity)
        .first()?
        .expect("grouping emits one mapping");

    let odds = groups.get(&Value::from(1)).expect("odd bucket");
    let evens = groups.get(&Value::from(0)).expect("even bucket");
    assert_collections_equal(odds.as_list().unwrap(), &ints([1, 3, 5]));
    assert_collections_equal(evens.as_list().unwrap(), &ints([2, 4]));
    Ok(())
}

#[test]
fn group_by_collapses_the_stream_to_one_element() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let n = stream_of!(&p, 1, 2, 3, 4, 5, 6).group_by(parity).count()?;
    assert_eq!(n, 1);
    Ok(())
}

#[test]
fn group_by_stays_chainable() -> anyhow::Result<()> {
    // Downstream stages see exactly one value: the whole mapping.
    let p = TestPipeline::new();
    let sizes = stream_of!(&p, 10, 11, 12, 13)
        .group_by(parity)
        .map(|m| Value::from(m.as_map().map_or(0, <[(Value, Value)]>::len) as i64))
        .collect()?;
    assert_collections_equal(&sizes, &ints([2]));
    Ok(())
}

#[test]
fn group_by_on_empty_input_emits_an_empty_mapping() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let groups = stream_of!(&p)
        .group_by(parity)
        .first()?
        .expect("grouping emits one mapping even when empty");
    assert_eq!(groups, Value::Map(Vec::new()));
    Ok(())
}

use rillflow::Value;

#[test]
fn json_round_trip_is_lossless() -> anyhow::Result<()> {
    let original = Value::Map(vec![
        (Value::from("name"), Value::from("pipeline")),
        (Value::from("size"), Value::from(42)),
        (Value::from("ratio"), Value::float(0.5)?),
        (
            Value::from("tags"),
            Value::List(vec![Value::from(true), Value::Null]),
        ),
    ]);

    let json = original.to_json()?;
    let restored = Value::from_json(&json)?;
    assert_eq!(restored, original);
    Ok(())
}

#[test]
fn kind_names_each_variant() -> anyhow::Result<()> {
    assert_eq!(Value::Null.kind(), "null");
    assert_eq!(Value::from(true).kind(), "bool");
    assert_eq!(Value::from(1).kind(), "int");
    assert_eq!(Value::float(1.5)?.kind(), "float");
    assert_eq!(Value::from("x").kind(), "str");
    assert_eq!(Value::List(Vec::new()).kind(), "list");
    assert_eq!(Value::Map(Vec::new()).kind(), "map");
    Ok(())
}

#[test]
fn nan_floats_are_rejected() {
    assert!(Value::float(f64::NAN).is_err());
    assert!(Value::float(1.0).is_ok());
}

#[test]
fn map_lookup_uses_structural_equality() {
    let map = Value::Map(vec![
        (Value::List(vec![Value::from(1)]), Value::from("one")),
        (Value::from(2), Value::from("two")),
    ]);

    assert_eq!(
        map.get(&Value::List(vec![Value::from(1)])),
        Some(&Value::from("one"))
    );
    assert_eq!(map.get(&Value::from(2)), Some(&Value::from("two")));
    assert_eq!(map.get(&Value::from(3)), None);
    assert_eq!(Value::from(1).get(&Value::from(1)), None);
}

#[test]
fn accessors_match_variants() -> anyhow::Result<()> {
    assert_eq!(Value::from(7).as_int(), Some(7));
    assert_eq!(Value::from(7).as_str(), None);
    assert_eq!(Value::float(2.5)?.as_float(), Some(2.5));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(
        Value::List(vec![Value::Null]).as_list().map(<[Value]>::len),
        Some(1)
    );
    Ok(())
}

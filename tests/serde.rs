#![cfg(feature = "serde")]

use dectable::{
    Aggregator, DecisionEngine, DecisionTable, DecisionTableBuilder, HitPolicy, InputClause,
    InputEntry, OutputClause, Value, Variables,
};
use serde_json::json;

fn discount_table() -> DecisionTable {
    DecisionTableBuilder::new("discount")
        .name("Discount")
        .input(InputClause::typed("age", "integer"))
        .input(InputClause::new("tier"))
        .output(OutputClause::new("rate").with_output_values([0.3, 0.2, 0.0]))
        .hit_policy(HitPolicy::Priority)
        .rule(|r| r.id("young").when("< 18").any().then("0.2"))
        .rule(|r| r.id("gold").any().when(r#""gold""#).then("0.3"))
        .rule(|r| r.any().any().then("0.0"))
        .build()
        .unwrap()
}

#[test]
fn table_round_trips_through_json() {
    let table = discount_table();
    let encoded = serde_json::to_string(&table).unwrap();
    let decoded: DecisionTable = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, table);
    assert_eq!(decoded.rules()[1].id(), Some("gold"));
    assert_eq!(decoded.rules()[2].inputs(), [InputEntry::Any, InputEntry::Any]);

    let vars = Variables::new().set("age", "12").set("tier", "gold");
    let result = DecisionEngine::new().evaluate(&decoded, &vars).unwrap();
    assert_eq!(result.single_entry(), Ok(Some(&Value::Float(0.3))));
}

#[test]
fn rule_with_missing_entry_is_rejected() {
    let mut encoded = serde_json::to_value(discount_table()).unwrap();
    encoded["rules"][0]["inputs"]
        .as_array_mut()
        .unwrap()
        .remove(1);

    let err = serde_json::from_value::<DecisionTable>(encoded).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rule young has 1 input entries but the table has 2 input clauses"
    );
}

#[test]
fn duplicate_clause_is_rejected() {
    let mut encoded = serde_json::to_value(discount_table()).unwrap();
    encoded["inputs"][1] = encoded["inputs"][0].clone();

    let err = serde_json::from_value::<DecisionTable>(encoded).unwrap_err();
    assert_eq!(err.to_string(), "duplicate input clause name 'age'");
}

#[test]
fn misplaced_aggregator_is_rejected() {
    let mut encoded = serde_json::to_value(discount_table()).unwrap();
    encoded["aggregator"] = serde_json::to_value(Aggregator::Sum).unwrap();

    let err = serde_json::from_value::<DecisionTable>(encoded).unwrap_err();
    assert!(err.to_string().contains("requires hit policy COLLECT"), "{err}");
}

#[test]
fn hand_written_table_uses_defaults() {
    let table: DecisionTable = serde_json::from_value(json!({
        "id": "constants",
        "outputs": [{ "name": "y", "type_ref": null, "values": [] }],
        "rules": [{ "id": null, "inputs": [], "outputs": [{ "text": "1", "language": null }] }],
    }))
    .unwrap();

    assert_eq!(table.name(), None);
    assert!(table.inputs().is_empty());
    assert_eq!(table.hit_policy(), HitPolicy::Unique);
    assert_eq!(table.aggregator(), None);

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new())
        .unwrap();
    assert_eq!(result.single_entry(), Ok(Some(&Value::Int(1))));
}

#[test]
fn value_round_trips_through_json() {
    let value = Value::List(vec![
        Value::Null,
        Value::Bool(true),
        Value::Int(7),
        Value::from("seven"),
    ]);
    let encoded = serde_json::to_string(&value).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&encoded).unwrap(), value);
}

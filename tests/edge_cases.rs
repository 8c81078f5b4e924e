use dectable::{
    Aggregator, ClauseKind, DecisionEngine, DecisionTable, DecisionTableBuilder, EvaluateError,
    Expression, ExpressionError, HitPolicy, InputClause, OutputClause, TableError, Value,
    Variables,
};

#[test]
fn single_rule_table() {
    let table = DecisionTableBuilder::new("only")
        .input(InputClause::new("x"))
        .output(OutputClause::new("y"))
        .rule(|r| r.when("1").then(r#""one""#))
        .build()
        .unwrap();

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("x", 1_i64))
        .unwrap();
    assert_eq!(result.single_entry(), Ok(Some(&Value::from("one"))));
}

#[test]
fn table_without_inputs_matches_every_rule() {
    let table = DecisionTableBuilder::new("constants")
        .output(OutputClause::new("y"))
        .hit_policy(HitPolicy::RuleOrder)
        .rule(|r| r.then("1"))
        .rule(|r| r.then("2"))
        .build()
        .unwrap();

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new())
        .unwrap();
    assert_eq!(result.collect_entries("y"), vec![&Value::Int(1), &Value::Int(2)]);
}

#[test]
fn table_without_rules() {
    let table = DecisionTableBuilder::new("empty")
        .input(InputClause::new("x"))
        .output(OutputClause::new("y"))
        .hit_policy(HitPolicy::Collect)
        .build()
        .unwrap();

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("x", 1_i64))
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn output_sees_coerced_input() {
    let table = DecisionTableBuilder::new("echo")
        .input(InputClause::typed("age", "integer"))
        .output(OutputClause::new("age_out"))
        .rule(|r| r.any().then("age"))
        .build()
        .unwrap();

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("age", "7"))
        .unwrap();
    assert_eq!(result.single_entry(), Ok(Some(&Value::Int(7))));
}

#[test]
fn multiple_output_columns() {
    let table = DecisionTableBuilder::new("shipping")
        .input(InputClause::new("weight"))
        .output(OutputClause::new("carrier"))
        .output(OutputClause::typed("cost", "double"))
        .rule(|r| r.id("parcel").when("<= 2").then(r#""post""#).then("4"))
        .rule(|r| r.id("freight").when("> 2").then(r#""truck""#).then("19.5"))
        .build()
        .unwrap();
    assert_eq!(table.rules()[1].id(), Some("freight"));
    assert_eq!(table.rules()[1].inputs().len(), 1);
    assert_eq!(
        table.rules()[1].outputs(),
        [Expression::new(r#""truck""#), Expression::new("19.5")]
    );

    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("weight", 1.5_f64))
        .unwrap();
    let rule = result.single_result().unwrap().unwrap();
    assert_eq!(rule.rule_id(), Some("parcel"));
    assert_eq!(rule.get("carrier"), Some(&Value::from("post")));
    assert_eq!(rule.get("cost"), Some(&Value::Float(4.0)));
    assert!(rule.single_entry().is_err());
    assert_eq!(rule.to_string(), r#"{carrier: "post", cost: 4}"#);
}

#[test]
fn unknown_type_is_fatal() {
    let table = DecisionTableBuilder::new("dates")
        .input(InputClause::typed("when", "date"))
        .output(OutputClause::new("y"))
        .rule(|r| r.any().then("1"))
        .build()
        .unwrap();

    let err = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("when", "2024-01-01"))
        .unwrap_err();
    match err {
        EvaluateError::UnknownType {
            clause,
            kind,
            type_name,
        } => {
            assert_eq!(clause, "when");
            assert_eq!(kind, ClauseKind::Input);
            assert_eq!(type_name, "date");
        }
        other => panic!("expected UnknownType, got {other:?}"),
    }

    // A null value never reaches the factory, so the unknown type goes unnoticed.
    let result = DecisionEngine::new()
        .evaluate(&table, &Variables::new())
        .unwrap();
    assert_eq!(result.single_entry(), Ok(Some(&Value::Int(1))));
}

#[test]
fn coercion_failure_carries_value() {
    let table = DecisionTableBuilder::new("age")
        .input(InputClause::typed("age", "integer"))
        .output(OutputClause::new("y"))
        .rule(|r| r.any().then("1"))
        .build()
        .unwrap();

    let err = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("age", "forty"))
        .unwrap_err();
    assert!(matches!(
        &err,
        EvaluateError::Coercion { clause, value, .. }
            if clause == "age" && *value == Value::from("forty")
    ));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn output_coercion_failure() {
    let table = DecisionTableBuilder::new("flags")
        .output(OutputClause::typed("flag", "boolean"))
        .rule(|r| r.then(r#""maybe""#))
        .build()
        .unwrap();

    let err = DecisionEngine::new()
        .evaluate(&table, &Variables::new())
        .unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::Coercion {
            kind: ClauseKind::Output,
            ..
        }
    ));
}

#[test]
fn unsupported_language_is_reported() {
    let table = DecisionTableBuilder::new("scripted")
        .input(InputClause::new("x"))
        .output(OutputClause::new("y"))
        .rule(|r| r.when(Expression::new("x > 1").with_language("javascript")).then("1"))
        .build()
        .unwrap();

    let err = DecisionEngine::new()
        .evaluate(&table, &Variables::new().set("x", 2_i64))
        .unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::Expression(ExpressionError::UnsupportedLanguage { ref language })
            if language == "javascript"
    ));
}

#[test]
fn invalid_tables_are_rejected() {
    let duplicate = DecisionTableBuilder::new("t")
        .input(InputClause::new("a"))
        .input(InputClause::new("a"))
        .output(OutputClause::new("y"))
        .build();
    assert_eq!(
        duplicate,
        Err(TableError::DuplicateClause {
            kind: ClauseKind::Input,
            name: "a".into(),
        })
    );

    let no_outputs = DecisionTableBuilder::new("t")
        .input(InputClause::new("a"))
        .build();
    assert_eq!(no_outputs, Err(TableError::NoOutputs));

    let short_rule = DecisionTableBuilder::new("t")
        .input(InputClause::new("a"))
        .input(InputClause::new("b"))
        .output(OutputClause::new("y"))
        .rule(|r| r.id("short").when("1").then("2"))
        .build();
    assert_eq!(
        short_rule,
        Err(TableError::InputArity {
            rule: "short".into(),
            expected: 2,
            found: 1,
        })
    );

    let missing_output = DecisionTableBuilder::new("t")
        .output(OutputClause::new("y"))
        .output(OutputClause::new("z"))
        .rule(|r| r.then("1"))
        .build();
    assert_eq!(
        missing_output,
        Err(TableError::OutputArity {
            rule: "#1".into(),
            expected: 2,
            found: 1,
        })
    );

    let wrong_policy = DecisionTableBuilder::new("t")
        .output(OutputClause::new("y"))
        .hit_policy(HitPolicy::First)
        .aggregate(Aggregator::Sum)
        .build();
    assert_eq!(
        wrong_policy,
        Err(TableError::AggregatorRequiresCollect {
            aggregator: Aggregator::Sum,
            policy: HitPolicy::First,
        })
    );
}

#[test]
fn non_numeric_aggregation_is_fatal() {
    let table = DecisionTableBuilder::new("labels")
        .output(OutputClause::new("label"))
        .hit_policy(HitPolicy::Collect)
        .aggregate(Aggregator::Max)
        .rule(|r| r.then("3"))
        .rule(|r| r.then(r#""three""#))
        .build()
        .unwrap();

    let err = DecisionEngine::new()
        .evaluate(&table, &Variables::new())
        .unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::NonNumericAggregation {
            aggregator: Aggregator::Max,
            ..
        }
    ));
}

#[test]
fn table_is_cloneable_and_displayable() {
    let table: DecisionTable = DecisionTable::builder("dish")
        .input(InputClause::new("season"))
        .output(OutputClause::new("dish"))
        .hit_policy(HitPolicy::Collect)
        .aggregate(Aggregator::Count)
        .rule(|r| r.when(r#""Fall""#).then(r#""Spareribs""#))
        .build()
        .unwrap();

    assert_eq!(table.clone(), table);
    assert_eq!(
        table.to_string(),
        "DecisionTable(dish, 1 inputs, 1 outputs, 1 rules, COLLECT COUNT)"
    );
}

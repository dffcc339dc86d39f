//! Example demonstrating the typed expression interpreter

use chrono::NaiveTime;
use std::sync::Arc;
use typedexpr::builtin::{standard_domain, FieldAccessor, BOOLEAN, INTEGER, INTERVAL, STRING, TIME};
use typedexpr::document::ExpressionDocument;
use typedexpr::domain::{DomainType, EntityAttribute};
use typedexpr::expression::{
    ArithmeticOperator, ComparisonOperator, Context, Expression, ExpressionInterpreter,
    FunctionInvocation, Path,
};
use typedexpr::value::{TemporalInterval, Value};

fn clock(hour: u32, minute: u32) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid time {}:{}", hour, minute))
}

fn main() -> anyhow::Result<()> {
    println!("Typed Expression Interpreter Demo");
    println!("=================================");

    // Domain: the builtin types plus a Person entity read from object values
    let mut builder = standard_domain()?;
    let integer = builder.get_type(INTEGER)?;
    let string = builder.get_type(STRING)?;
    let boolean = builder.get_type(BOOLEAN)?;
    let time = builder.get_type(TIME)?;
    let interval = builder.get_type(INTERVAL)?;
    let accessor = Arc::new(FieldAccessor);
    let person = builder.add_type(DomainType::entity(
        "Person",
        vec![
            EntityAttribute::new("name", string.clone()).with_accessor(accessor.clone()),
            EntityAttribute::new("age", integer.clone()).with_accessor(accessor.clone()),
            EntityAttribute::new("nickname", string.clone()).with_accessor(accessor.clone()),
            EntityAttribute::new("wakes", time.clone()).with_accessor(accessor),
        ],
    ))?;
    let model = Arc::new(builder.build());
    let interpreter = ExpressionInterpreter::new(model.clone());

    let context = Context::default().with_root(
        "p",
        person.clone(),
        Value::object([
            ("name", Value::from("Alice")),
            ("age", Value::Integer(25)),
            ("nickname", Value::Null),
            ("wakes", Value::from(clock(6, 45)?)),
        ]),
    );
    let path = |names: &[&str]| -> anyhow::Result<Expression> {
        Ok(Expression::path(Path::resolve("p", person.clone(), names)?))
    };

    // Example 1: Basic expression evaluation
    println!("\n1. Basic Expression Evaluation");
    println!("------------------------------");

    // p.age > 18
    let adult = Expression::comparison(
        &boolean,
        ComparisonOperator::Greater,
        path(&["age"])?,
        Expression::literal(&integer, 18i64),
    );
    println!("p.age > 18: {}", interpreter.evaluate(&adult, &context)?);

    // p.age + 5
    let older = Expression::arithmetic(
        &integer,
        ArithmeticOperator::Plus,
        path(&["age"])?,
        Expression::literal(&integer, 5i64),
    );
    println!("p.age + 5: {}", interpreter.evaluate(&older, &context)?);

    // LENGTH(p.name)
    let length = Expression::function(FunctionInvocation::positional(
        model.require_function("LENGTH")?,
        vec![path(&["name"])?],
    )?);
    println!("LENGTH(p.name): {}", interpreter.evaluate(&length, &context)?);

    // Example 2: NULL handling
    println!("\n2. NULL Handling");
    println!("----------------");

    let nickname_is_null = Expression::is_null(&boolean, path(&["nickname"])?);
    println!(
        "p.nickname IS NULL: {}",
        interpreter.evaluate(&nickname_is_null, &context)?
    );

    let nickname_equals = Expression::comparison(
        &boolean,
        ComparisonOperator::Equal,
        path(&["nickname"])?,
        Expression::literal(&string, "Al"),
    );
    println!(
        "p.nickname = 'Al': {} (as predicate: {})",
        interpreter.evaluate(&nickname_equals, &context)?,
        interpreter.evaluate_predicate(&nickname_equals, &context)?
    );

    let either = Expression::or(&boolean, vec![nickname_equals, adult.clone()]);
    println!(
        "p.nickname = 'Al' OR p.age > 18: {}",
        interpreter.evaluate(&either, &context)?
    );

    // Example 3: BETWEEN and IN
    println!("\n3. BETWEEN and IN");
    println!("-----------------");

    let wakes_early = Expression::between(
        &boolean,
        path(&["wakes"])?,
        Expression::literal(&time, clock(5, 0)?),
        Expression::arithmetic(
            &time,
            ArithmeticOperator::Plus,
            Expression::literal(&time, clock(6, 0)?),
            Expression::literal(&interval, TemporalInterval::clock(1, 0, 0)),
        ),
    );
    println!(
        "p.wakes BETWEEN 05:00:00 AND 06:00:00 + 1 HOURS: {}",
        interpreter.evaluate(&wakes_early, &context)?
    );

    let named = Expression::in_list(
        &boolean,
        path(&["name"])?,
        vec![
            Expression::literal(&string, "Bob"),
            Expression::literal(&string, "Alice"),
        ],
    );
    println!(
        "p.name IN ('Bob', 'Alice'): {}",
        interpreter.evaluate(&named, &context)?
    );

    // Example 4: Expression documents
    println!("\n4. Expression Documents");
    println!("-----------------------");

    let document = ExpressionDocument::from_json(
        r#"{
            "kind": "and",
            "predicates": [
                {
                    "kind": "comparison",
                    "operator": ">=",
                    "left": {"kind": "path", "alias": "p", "attributes": ["age"]},
                    "right": {"kind": "literal", "value": 21}
                },
                {
                    "kind": "is_null",
                    "operand": {"kind": "path", "alias": "p", "attributes": ["name"]},
                    "negated": true
                }
            ]
        }"#,
    )?;
    let expression = document.resolve(&model, &context)?;
    println!(
        "p.age >= 21 AND p.name IS NOT NULL: {}",
        interpreter.evaluate_predicate(&expression, &context)?
    );

    Ok(())
}

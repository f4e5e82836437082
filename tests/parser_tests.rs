use quell::ast::{CompareOp, Condition, FieldPath, Operand, PathSegment};
use quell::value::Value;
use quell::{parse_select, parse_where};

fn field(name: &str) -> Operand {
    Operand::Path(FieldPath::new(vec![PathSegment::Field(name.to_string())]))
}

fn int(n: i64) -> Operand {
    Operand::Literal(Value::Integer(n))
}

fn string(s: &str) -> Operand {
    Operand::Literal(Value::String(s.to_string()))
}

fn eq(lhs: Operand, rhs: Operand) -> Condition {
    Condition::compare(lhs, CompareOp::Eq, rhs)
}

#[test]
fn test_simple_equality() {
    let condition = parse_where("quantity = 10").unwrap().unwrap();
    assert_eq!(condition, eq(field("quantity"), int(10)));
}

#[test]
fn test_blank_where_is_no_condition() {
    assert_eq!(parse_where("").unwrap(), None);
    assert_eq!(parse_where("   ").unwrap(), None);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let condition = parse_where("a = 1 and b = 2 or c = 3").unwrap().unwrap();
    assert_eq!(
        condition,
        Condition::or(
            Condition::and(eq(field("a"), int(1)), eq(field("b"), int(2))),
            eq(field("c"), int(3)),
        )
    );
}

#[test]
fn test_parentheses_group_explicitly() {
    let condition = parse_where("a = 1 and (b = 2 or c = 3)").unwrap().unwrap();
    assert_eq!(
        condition,
        Condition::and(
            eq(field("a"), int(1)),
            Condition::or(eq(field("b"), int(2)), eq(field("c"), int(3))),
        )
    );
}

#[test]
fn test_not_binds_tighter_than_and() {
    let condition = parse_where("not a = 1 and b = 2").unwrap().unwrap();
    assert_eq!(
        condition,
        Condition::and(
            Condition::not(eq(field("a"), int(1))),
            eq(field("b"), int(2)),
        )
    );
}

#[test]
fn test_negated_forms_wrap_the_positive_comparison() {
    assert_eq!(
        parse_where("name not like 'ink'").unwrap().unwrap(),
        Condition::not(Condition::compare(
            field("name"),
            CompareOp::Like,
            string("ink")
        ))
    );
    assert_eq!(
        parse_where("quantity not in (20)").unwrap().unwrap(),
        Condition::not(Condition::compare(
            field("quantity"),
            CompareOp::In,
            Operand::List(vec![Value::Integer(20)]),
        ))
    );
    assert_eq!(
        parse_where("owner is null").unwrap().unwrap(),
        eq(field("owner"), Operand::Literal(Value::Null))
    );
    assert_eq!(
        parse_where("name is not null").unwrap().unwrap(),
        Condition::not(eq(field("name"), Operand::Literal(Value::Null)))
    );
}

#[test]
fn test_in_list_with_several_literals() {
    assert_eq!(
        parse_where("quantity in (5, 10)").unwrap().unwrap(),
        Condition::compare(
            field("quantity"),
            CompareOp::In,
            Operand::List(vec![Value::Integer(5), Value::Integer(10)]),
        )
    );
}

#[test]
fn test_paths_with_indexes_and_any_element() {
    let condition = parse_where("items[*].quantity = 10 and items[0].name = 'tap'")
        .unwrap()
        .unwrap();
    assert_eq!(
        condition,
        Condition::and(
            Condition::compare(
                Operand::Path(FieldPath::new(vec![
                    PathSegment::Field("items".to_string()),
                    PathSegment::AnyElement,
                    PathSegment::Field("quantity".to_string()),
                ])),
                CompareOp::Eq,
                int(10),
            ),
            Condition::compare(
                Operand::Path(FieldPath::new(vec![
                    PathSegment::Field("items".to_string()),
                    PathSegment::Index(0),
                    PathSegment::Field("name".to_string()),
                ])),
                CompareOp::Eq,
                string("tap"),
            ),
        )
    );
}

#[test]
fn test_negative_number_literals() {
    assert_eq!(
        parse_where("delta = -5").unwrap().unwrap(),
        eq(field("delta"), int(-5))
    );
    assert_eq!(
        parse_where("delta > -1.5").unwrap().unwrap(),
        Condition::compare(
            field("delta"),
            CompareOp::Gt,
            Operand::Literal(Value::Float(-1.5)),
        )
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let upper = parse_where("name LIKE 'ta' AND owner IS NULL").unwrap().unwrap();
    let lower = parse_where("name like 'ta' and owner is null").unwrap().unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn test_blank_and_star_selects_are_identity() {
    assert!(parse_select("").unwrap().is_identity());
    assert!(parse_select(" * ").unwrap().is_identity());
}

#[test]
fn test_select_aliases_and_derived_keys() {
    let select = parse_select("name, 2 * price as doublePrice, items[0].name").unwrap();
    let keys: Vec<String> = select.projections.iter().map(|p| p.output_key()).collect();
    assert_eq!(keys, vec!["name", "doublePrice", "items[0].name"]);
}

#[test]
fn test_trailing_comma_in_select_is_an_error() {
    let err = parse_select("a,").unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert!(err.to_string().starts_with("failed to parse expression due to:"));
}

#[test]
fn test_dangling_operator_in_where_is_an_error() {
    let err = parse_where("x+").unwrap_err();
    assert!(!err.errors.is_empty());
}

#[test]
fn test_every_syntax_error_is_reported() {
    // the first predicate is broken and so is the second; recovery at the
    // conjunction lets the parser find both
    let err = parse_where("a + 1 and b like").unwrap_err();
    assert!(err.errors.len() >= 2, "got: {}", err);
}

#[test]
fn test_error_positions_are_one_based() {
    let err = parse_where("= 1").unwrap_err();
    assert_eq!(err.errors[0].position.line, 1);
    assert_eq!(err.errors[0].position.column, 1);
}

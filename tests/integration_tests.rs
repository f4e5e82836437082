use quell::{Configuration, Error, JsonMappingProvider};
use serde::Deserialize;
use serde_json::json;

const SIMPLE_JSON: &str = r#"{"name":"tap","price":49.99,"quantity":10,"active":true,"owner":null,"since":"2018-09-07"}"#;

const JSON_ARRAY: &str = r#"[
  {"name":"tap","price":49.99,"quantity":10,"active":true,"owner":null,"since":"2018-09-07"},
  {"name":"sink","price":99.99,"quantity":100,"active":false,"owner":null,"since":"2018-09-02"}
]"#;

const COMPLEX_JSON: &str = r#"{"type":"catalog","items":[
  {"name":"tap","price":49.99,"quantity":10,"active":true,"owner":null,"since":"2018-09-07"},
  {"name":"sink","price":99.99,"quantity":100,"active":false,"owner":null,"since":"2018-09-02"}
]}"#;

const JSON_WITH_SINGLE_ARRAY_ATTRIBUTE: &str = r#"{"items":[
  {"name":"tap","price":49.99,"quantity":10,"active":true,"owner":null,"since":"2018-09-07"},
  {"name":"sink","price":99.99,"quantity":100,"active":false,"owner":null,"since":"2018-09-02"}
]}"#;

const ALL_OPERATORS: &str = "quantity = 10 \
     and quantity != 8 \
     and quantity > 9 \
     and quantity < 11 \
     and quantity >= 10 \
     and quantity <= 10 \
     and price = 49.99 \
     and price > 45.0 \
     and price < 55.0 \
     and price >= 49.0 \
     and price <=50.0 \
     and quantity in (5, 10) \
     and quantity not in (20) \
     and name = 'tap' \
     and name like 'ta' \
     and name not like 'ink' \
     and since = '2018-09-07' \
     and active = true \
     and name is not null \
     and owner is null";

/// Key order is not stable through serialization, so results are compared
/// as parsed JSON.
fn as_json(rendered: &str) -> serde_json::Value {
    serde_json::from_str(rendered).unwrap()
}

fn simple() -> serde_json::Value {
    as_json(SIMPLE_JSON)
}

#[test]
fn test_all_operators_against_a_simple_object() {
    let result = quell::read(SIMPLE_JSON, "*", ALL_OPERATORS).unwrap();
    assert_eq!(as_json(&result), simple());
}

#[test]
fn test_all_operators_against_an_array() {
    // only the first element satisfies the filter, so the result collapses
    // to a bare object
    let result = quell::read(JSON_ARRAY, "*", ALL_OPERATORS).unwrap();
    assert_eq!(as_json(&result), simple());
}

#[test]
fn test_all_operators_against_a_wrapped_array() {
    let result = quell::read(JSON_WITH_SINGLE_ARRAY_ATTRIBUTE, "*", ALL_OPERATORS).unwrap();
    assert_eq!(as_json(&result), json!({"items": [simple()]}));
}

#[test]
fn test_nested_paths_against_a_complex_object() {
    let result = quell::read(
        COMPLEX_JSON,
        "*",
        "type = 'catalog' and items[*].quantity = 10 and items[0].name = 'tap'",
    )
    .unwrap();
    assert_eq!(as_json(&result), as_json(COMPLEX_JSON));
}

#[test]
fn test_or_conjunction_keeps_both_records() {
    let result = quell::read(JSON_ARRAY, "*", "quantity = 10 or name = 'sink'").unwrap();
    assert_eq!(as_json(&result), as_json(JSON_ARRAY));
}

#[test]
fn test_and_conjunction_keeps_one_record() {
    let result = quell::read(JSON_ARRAY, "*", "quantity = 10 and active = true").unwrap();
    assert_eq!(as_json(&result), simple());
}

#[test]
fn test_projections() {
    let result = quell::read(SIMPLE_JSON, "name, price, quantity", "name='tap'").unwrap();
    assert_eq!(
        as_json(&result),
        json!({"name": "tap", "price": 49.99, "quantity": 10})
    );
}

#[test]
fn test_projections_with_array_accessors() {
    let result = quell::read(
        COMPLEX_JSON,
        "type, items[0].name as firstItemName, items[1].active as secondItemStatus",
        "type = 'catalog'",
    )
    .unwrap();
    assert_eq!(
        as_json(&result),
        json!({"type": "catalog", "firstItemName": "tap", "secondItemStatus": false})
    );
}

#[test]
fn test_projections_with_arithmetic() {
    let result = quell::read(
        SIMPLE_JSON,
        "2 + 2 as four, 2 * price as doublePrice, 5 + quantity as quantityPlusFive, 20 - quantity as twentyMinusQuantity",
        "name='tap'",
    )
    .unwrap();
    assert_eq!(
        as_json(&result),
        json!({"four": 4, "doublePrice": 99.98, "quantityPlusFive": 15, "twentyMinusQuantity": 10})
    );
}

#[test]
fn test_projections_with_string_literals() {
    let result = quell::read(
        SIMPLE_JSON,
        "'Laurel' + ' and ' + 'Hardy' as twosome, 'silver ' + name as qualifiedName",
        "name='tap'",
    )
    .unwrap();
    assert_eq!(
        as_json(&result),
        json!({"twosome": "Laurel and Hardy", "qualifiedName": "silver tap"})
    );
}

#[test]
fn test_projections_inside_a_wrapped_array() {
    let result = quell::read(JSON_WITH_SINGLE_ARRAY_ATTRIBUTE, "name", "quantity = 10").unwrap();
    assert_eq!(as_json(&result), json!({"items": [{"name": "tap"}]}));
}

#[test]
fn test_no_matches_serializes_as_an_empty_object() {
    let result = quell::read(SIMPLE_JSON, "*", "quantity = 999").unwrap();
    assert_eq!(result, "{}");
}

#[test]
fn test_an_empty_record_never_counts_as_a_match() {
    let context = quell::parse("{}").unwrap();
    assert!(!context.exists("").unwrap());
    assert_eq!(context.read("*", "").unwrap(), "{}");
}

#[test]
fn test_wrapped_arrays_accept_quantified_paths() {
    // the wrapper key prefix works both dotted and quantified
    let result =
        quell::read(JSON_WITH_SINGLE_ARRAY_ATTRIBUTE, "*", "items[*].quantity = 10").unwrap();
    assert_eq!(as_json(&result), json!({"items": [simple()]}));

    let result = quell::read(JSON_WITH_SINGLE_ARRAY_ATTRIBUTE, "*", "items.name = 'sink'").unwrap();
    let expected = as_json(JSON_WITH_SINGLE_ARRAY_ATTRIBUTE)["items"][1].clone();
    assert_eq!(as_json(&result), json!({"items": [expected]}));
}

#[test]
fn test_exists() {
    let context = quell::parse(JSON_ARRAY).unwrap();
    assert!(context.exists("name = 'sink'").unwrap());
    assert!(!context.exists("name = 'bath'").unwrap());
    assert!(context.exists("").unwrap());
}

#[derive(Debug, PartialEq, Deserialize)]
struct Item {
    name: String,
    quantity: i64,
}

#[test]
fn test_read_as_a_map() {
    let out: std::collections::HashMap<String, serde_json::Value> = quell::parse(SIMPLE_JSON)
        .unwrap()
        .read_as("name, price", "name='tap'")
        .unwrap();
    assert_eq!(out["name"], json!("tap"));
    assert_eq!(out["price"], json!(49.99));
}

#[test]
fn test_read_as_a_bespoke_type() {
    let out: Item = quell::parse(SIMPLE_JSON)
        .unwrap()
        .read_as("name, quantity", "name='tap'")
        .unwrap();
    assert_eq!(
        out,
        Item {
            name: "tap".to_string(),
            quantity: 10
        }
    );
}

#[test]
fn test_read_as_a_list() {
    let out: Vec<Item> = quell::parse(JSON_ARRAY)
        .unwrap()
        .read_as("name, quantity", "name != 'foo'")
        .unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.contains(&Item {
        name: "tap".to_string(),
        quantity: 10
    }));
    assert!(out.contains(&Item {
        name: "sink".to_string(),
        quantity: 100
    }));
}

#[test]
fn test_parse_an_already_parsed_value() {
    let context = quell::using(Configuration::default())
        .parse_value(json!({"name": "tap", "quantity": 10}));
    let result = context.read("name", "quantity=10").unwrap();
    assert_eq!(as_json(&result), json!({"name": "tap"}));
}

#[test]
fn test_parse_from_a_reader() {
    let context = quell::using(Configuration::default())
        .parse_reader(SIMPLE_JSON.as_bytes())
        .unwrap();
    let result = context.read("*", "quantity = 10").unwrap();
    assert_eq!(as_json(&result), simple());
}

#[test]
fn test_parse_from_a_file() {
    let path = std::env::temp_dir().join("quell_read_from_file.json");
    std::fs::write(&path, SIMPLE_JSON).unwrap();

    let context = quell::using(Configuration::default()).parse_file(&path).unwrap();
    let result = context.read("*", "quantity = 10").unwrap();
    assert_eq!(as_json(&result), simple());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_invalid_input_is_an_error() {
    let err = quell::parse("not json").unwrap_err();
    assert!(matches!(err, Error::Mapping(_)));
}

#[test]
fn test_invalid_select_is_an_error() {
    let err = quell::read(SIMPLE_JSON, "a,", "").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(err.to_string().contains("failed to parse expression"));
}

#[test]
fn test_invalid_where_is_an_error() {
    let err = quell::read(SIMPLE_JSON, "", "x+").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

fn suppressing() -> Configuration {
    Configuration::builder().suppress_errors(true).build()
}

#[test]
fn test_suppression_hides_invalid_input() {
    let result = quell::using(suppressing())
        .parse("not json")
        .unwrap()
        .read("", "")
        .unwrap();
    assert_eq!(result, "{}");
}

#[test]
fn test_suppression_hides_an_invalid_select() {
    let result = quell::using(suppressing())
        .parse(SIMPLE_JSON)
        .unwrap()
        .read("a,", "")
        .unwrap();
    assert_eq!(result, "{}");
}

#[test]
fn test_suppression_hides_an_invalid_where() {
    let result = quell::using(suppressing())
        .parse(SIMPLE_JSON)
        .unwrap()
        .read("", "x+")
        .unwrap();
    assert_eq!(result, "{}");
}

#[test]
fn test_suppression_makes_exists_answer_false() {
    let context = quell::using(suppressing()).parse(SIMPLE_JSON).unwrap();
    assert!(!context.exists("x+").unwrap());
}

#[test]
fn test_pretty_printing() {
    let result = quell::using(
        Configuration::builder()
            .mapping_provider(JsonMappingProvider::pretty())
            .build(),
    )
    .parse(SIMPLE_JSON)
    .unwrap()
    .read("name", "")
    .unwrap();
    assert_eq!(result, "{\n  \"name\": \"tap\"\n}");
}

#[test]
fn test_reads_share_a_compiled_expression_cache() {
    let context = quell::using(Configuration::builder().lru_cache_size(2).build())
        .parse(JSON_ARRAY)
        .unwrap();
    for _ in 0..3 {
        let result = context.read("name", "quantity = 10").unwrap();
        assert_eq!(as_json(&result), json!({"name": "tap"}));
    }
}

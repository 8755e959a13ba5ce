use crate::literal::encode_untyped;
use crate::Value;
use graphql_parser::query as ast;
use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_string() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'Z', '7', ' ', '"', '\\', '\n', '\t', '\r', 'é', '-', '&', '$']),
        0..16,
    ).prop_map(String::from_iter)
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        arb_string().prop_map(Value::String),
        "[A-Z][A-Z_]{0,8}".prop_map(Value::Enum),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| prop_oneof![
        prop::collection::vec(inner.clone(), 0..5).prop_map(Value::List),
        prop::collection::btree_map("[a-z][a-zA-Z0-9]{0,6}", inner, 0..5)
            .prop_map(|fields| Value::Object(fields.into_iter().collect::<IndexMap<_, _>>())),
    ])
}

fn to_ast(value: &Value) -> ast::Value<'static, String> {
    match value {
        Value::Null => ast::Value::Null,
        Value::Bool(b) => ast::Value::Boolean(*b),
        Value::Int(i) => ast::Value::Int(
            ast::Number::from(i32::try_from(*i).expect("generated ints fit in i32")),
        ),
        Value::Float(f) => ast::Value::Float(*f),
        Value::String(s) => ast::Value::String(s.clone()),
        Value::Enum(name) => ast::Value::Enum(name.clone()),
        Value::List(items) => ast::Value::List(items.iter().map(to_ast).collect()),
        Value::Object(fields) => ast::Value::Object(
            fields.iter()
                .map(|(name, value)| (name.clone(), to_ast(value)))
                .collect::<BTreeMap<_, _>>(),
        ),
        other => panic!("not generated: {other:?}"),
    }
}

fn parse_argument(literal: &str) -> ast::Value<'static, String> {
    let doc_text = format!("query {{ field(arg: {literal}) }}");
    let doc = ast::parse_query::<String>(&doc_text)
        .unwrap_or_else(|err| panic!("`{literal}` failed to parse: {err}"))
        .into_static();
    let Some(ast::Definition::Operation(ast::OperationDefinition::Query(query))) =
        doc.definitions.into_iter().next() else {
        panic!("expected a query operation");
    };
    let Some(ast::Selection::Field(field)) = query.selection_set.items.into_iter().next() else {
        panic!("expected a field selection");
    };
    field.arguments.into_iter()
        .next()
        .map(|(_, value)| value)
        .expect("argument present")
}

proptest! {
    #[test]
    fn encoded_literals_parse_back_to_the_same_value(value in arb_value()) {
        let literal = encode_untyped(&value).expect("generated values encode");
        prop_assert_eq!(parse_argument(&literal), to_ast(&value));
    }
}

#[test]
fn nested_list_literal_parses_back() {
    let value = Value::List(vec![
        Value::Null,
        Value::List(vec![]),
        Value::List(vec![Value::Float(1.0)]),
        Value::List(vec![Value::Float(4.0), Value::Float(5.0), Value::Float(6.0)]),
    ]);
    let literal = encode_untyped(&value).unwrap();

    assert_eq!(parse_argument(&literal), to_ast(&value));
}

use crate::document::RequestPreparationError;
use crate::document::RequestTemplate;
use crate::literal::EncodingError;
use crate::schema::SchemaRegistry;
use crate::test_utils;
use crate::OperationKind;
use crate::Value;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::json;

fn values(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
    pairs.iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn template(registry: &SchemaRegistry, fragment: &str, kind: OperationKind) -> RequestTemplate {
    RequestTemplate::assemble(registry, fragment, None, kind).expect("fragment assembles")
}

#[test]
fn every_bind_parameter_must_be_supplied_exactly() {
    let registry = SchemaRegistry::builtin();
    let template = template(
        &registry,
        "{ pair(first: &a, second: &b) { id } }",
        OperationKind::Query,
    );

    let missing = template.bind(&registry, &values(&[("a", Value::Int(1))]));
    assert_eq!(
        missing.err(),
        Some(vec![RequestPreparationError::MissingBindParameter { name: "b".to_string() }]),
    );

    let extra = template.bind(&registry, &values(&[
        ("a", Value::Int(1)),
        ("b", Value::Int(2)),
        ("c", Value::Int(3)),
    ]));
    assert_eq!(
        extra.err(),
        Some(vec![RequestPreparationError::UnexpectedParameter { name: "c".to_string() }]),
    );

    let bound = template.bind(&registry, &values(&[("a", Value::Int(1)), ("b", Value::Int(2))]))
        .expect("complete bind");
    assert_eq!(bound.document(), "query { pair(first: 1, second: 2) { id } }");
    assert!(bound.variables().is_empty());
}

#[test]
fn each_occurrence_is_encoded_for_its_own_target() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "{ human(id: &id) { name } search(text: \"\", limit: &id) { __typename } }",
        OperationKind::Query,
    );

    let bound = template.bind(&registry, &values(&[("id", Value::Int(1000))])).unwrap();
    assert_eq!(
        bound.document(),
        "query { human(id: 1000) { name } search(text: \"\", limit: 1000) { __typename } }",
    );
}

#[test]
fn variables_and_bind_parameters_stay_independent() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "query Search($episode: Episode) {
            hero(episode: $episode) { name }
            search(text: &text) { __typename }
        }",
        OperationKind::Query,
    );

    let bound = template.bind(&registry, &values(&[
        ("episode", Value::Enum("JEDI".to_string())),
        ("text", Value::from("R2 \"Artoo\"")),
    ])).unwrap();

    assert!(bound.document().contains("hero(episode: $episode)"));
    assert!(bound.document().contains(r#"search(text: "R2 \"Artoo\"")"#));
    assert_eq!(bound.variables().get("episode"), Some(&json!("JEDI")));
    assert!(!bound.variables().contains_key("text"));
    assert_eq!(bound.operation_name(), Some("Search"));
    assert_eq!(bound.kind(), OperationKind::Query);
}

#[test]
fn one_name_may_feed_a_variable_and_a_bind_parameter() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "query ($text: String!) {
            a: search(text: $text) { __typename }
            b: search(text: &text) { __typename }
        }",
        OperationKind::Query,
    );

    let bound = template.bind(&registry, &values(&[("text", Value::from("Han"))])).unwrap();

    assert!(bound.document().contains("b: search(text: \"Han\")"));
    assert!(bound.document().contains("a: search(text: $text)"));
    assert_eq!(bound.variables().get("text"), Some(&json!("Han")));
}

#[test]
fn optional_variables_may_be_omitted() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "query ($episode: Episode, $limit: Int = 5, $text: String!) {
            hero(episode: $episode) { name }
            search(text: $text, limit: $limit) { __typename }
        }",
        OperationKind::Query,
    );

    let missing_required = template.bind(&registry, &IndexMap::new());
    assert_eq!(
        missing_required.err(),
        Some(vec![RequestPreparationError::MissingVariable { name: "text".to_string() }]),
    );

    let bound = template.bind(&registry, &values(&[("text", Value::from("Leia"))])).unwrap();
    assert_eq!(bound.variables().len(), 1);
}

#[test]
fn type_mismatches_name_the_offending_parameter() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "mutation ($episode: Episode!) {
            createReview(episode: $episode, review: {stars: &stars}) { stars }
        }",
        OperationKind::Mutation,
    );

    let result = template.bind(&registry, &values(&[
        ("episode", Value::Bool(true)),
        ("stars", Value::from("five")),
    ]));

    assert_eq!(
        result.err(),
        Some(vec![
            RequestPreparationError::BindParameterMismatch {
                name: "stars".to_string(),
                source: EncodingError::TypeMismatch {
                    expected: "Int".to_string(),
                    found: "string",
                },
            },
            RequestPreparationError::VariableTypeMismatch {
                name: "episode".to_string(),
                source: EncodingError::TypeMismatch {
                    expected: "Episode".to_string(),
                    found: "boolean",
                },
            },
        ]),
    );
}

#[test]
fn input_object_variables_are_converted_with_their_types() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "mutation ($review: ReviewInput!) {
            createReview(episode: JEDI, review: $review) { stars }
        }",
        OperationKind::Mutation,
    );

    let mut review = IndexMap::new();
    review.insert("stars".to_string(), Value::Int(4));
    review.insert("episodes".to_string(), Value::Enum("EMPIRE".to_string()));
    review.insert("meta".to_string(), Value::Json(json!({"source": "test"})));
    let bound = template.bind(&registry, &values(&[("review", Value::Object(review))])).unwrap();

    assert_eq!(
        serde_json::Value::Object(bound.variables().clone()),
        json!({"review": {"stars": 4, "episodes": ["EMPIRE"], "meta": {"source": "test"}}}),
    );
}

#[test]
fn bound_request_serializes_as_wire_body() {
    let registry = test_utils::star_wars_registry();
    let named = template(
        &registry,
        "query Hero($episode: Episode) { hero(episode: $episode) { name } }",
        OperationKind::Query,
    );
    let bound = named.bind(&registry, &values(&[("episode", Value::Enum("EMPIRE".to_string()))]))
        .unwrap();

    assert_eq!(
        serde_json::to_value(&bound).unwrap(),
        json!({
            "query": "query Hero($episode: Episode) { hero(episode: $episode) { name } }",
            "operationName": "Hero",
            "variables": {"episode": "EMPIRE"},
        }),
    );

    let anonymous = template(&registry, "{ hero { name } }", OperationKind::Query)
        .bind(&registry, &IndexMap::new())
        .unwrap();
    let body = serde_json::to_value(&anonymous).unwrap();
    assert!(body.get("operationName").is_none());
    assert_eq!(body["variables"], json!({}));
}

#[test]
fn one_template_binds_concurrently() {
    let registry = test_utils::star_wars_registry();
    let template = template(
        &registry,
        "{ human(id: &id) { name } }",
        OperationKind::Query,
    );

    let documents: Vec<String> = (0..64_i64)
        .into_par_iter()
        .map(|i| {
            template.bind(&registry, &values(&[("id", Value::from(format!("human-{i}")))]))
                .expect("bind succeeds")
                .document()
                .to_string()
        })
        .collect();

    for (i, document) in documents.iter().enumerate() {
        assert_eq!(document, &format!("query {{ human(id: \"human-{i}\") {{ name }} }}"));
    }
}

use crate::response::ErrorLocation;
use crate::response::PathSegment;
use crate::response::ResponseEnvelope;
use crate::response::ResponseError;
use serde_json::json;

#[test]
fn absent_members_deserialize_to_empty() {
    let envelope: ResponseEnvelope = serde_json::from_value(json!({
        "data": {"hero": null},
    })).unwrap();

    assert_eq!(envelope.data, Some(json!({"hero": null})));
    assert!(envelope.errors.is_empty());
    assert!(envelope.extensions.is_none());
    assert!(envelope.is_graphql_response());

    let envelope: ResponseEnvelope = serde_json::from_value(json!({
        "data": null,
        "errors": null,
    })).unwrap();
    assert_eq!(envelope, ResponseEnvelope::default());
    assert!(!envelope.is_graphql_response());
}

#[test]
fn errors_keep_locations_and_path_in_order() {
    let envelope: ResponseEnvelope = serde_json::from_value(json!({
        "errors": [{
            "message": "Name for character with ID 1002 could not be fetched.",
            "locations": [
                {"line": 6, "column": 7},
                {"line": 2, "column": 3, "sourceName": "hero.graphql"},
            ],
            "path": ["hero", "heroFriends", 1, "name"],
            "extensions": {"code": "CAN_NOT_FETCH_BY_ID"},
        }],
    })).unwrap();

    let error = &envelope.errors[0];
    assert_eq!(error.locations, vec![
        ErrorLocation { line: 6, column: 7, source_name: None },
        ErrorLocation { line: 2, column: 3, source_name: Some("hero.graphql".to_string()) },
    ]);
    assert_eq!(error.path, Some(vec![
        PathSegment::from("hero"),
        PathSegment::from("heroFriends"),
        PathSegment::Index(1),
        PathSegment::from("name"),
    ]));
    assert_eq!(
        error.extensions.as_ref().and_then(|ext| ext.get("code")),
        Some(&json!("CAN_NOT_FETCH_BY_ID")),
    );
    assert_eq!(
        error.to_string(),
        "Name for character with ID 1002 could not be fetched. (at hero.heroFriends[1].name)",
    );
}

#[test]
fn minimal_error_serializes_without_optional_members() {
    let envelope = ResponseEnvelope {
        errors: vec![ResponseError::new("boom")],
        ..Default::default()
    };

    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"errors": [{"message": "boom"}]}),
    );
}

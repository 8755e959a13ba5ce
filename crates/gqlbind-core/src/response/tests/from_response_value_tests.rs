use crate::decoder::DecodingError;
use crate::literal::EncodingError;
use crate::response::FromResponseValue;
use crate::response::ResponsePath;
use crate::response::ResponseValue;
use crate::response::TypedObject;
use crate::Value;
use chrono::NaiveDate;

fn review() -> TypedObject {
    TypedObject::new("Review")
        .with_field("stars", ResponseValue::Leaf(Value::Int(5)))
        .with_field("commentary", ResponseValue::Null)
        .with_field("createdAt", ResponseValue::Leaf(Value::String("2024-05-04".to_string())))
        .with_field("scores", ResponseValue::List(vec![
            ResponseValue::Leaf(Value::Float(1.5)),
            ResponseValue::Null,
            ResponseValue::Leaf(Value::Int(3)),
        ]))
}

#[test]
fn extracts_primitives_and_options() {
    let review = review();

    assert_eq!(review.get::<i32>("stars"), Ok(5));
    assert_eq!(review.get::<f64>("stars"), Ok(5.0));
    assert_eq!(review.get::<Option<String>>("commentary"), Ok(None));
    assert_eq!(
        review.get::<NaiveDate>("createdAt"),
        Ok(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()),
    );
    assert_eq!(
        review.get::<Vec<Option<f64>>>("scores"),
        Ok(vec![Some(1.5), None, Some(3.0)]),
    );
}

#[test]
fn null_for_required_value_reports_path() {
    let review = review();

    assert_eq!(
        review.get::<String>("commentary"),
        Err(DecodingError::UnexpectedValue {
            expected: "a string".to_string(),
            found: "null",
            path: ResponsePath::root().join("commentary"),
        }),
    );

    let err = review.get::<Vec<f64>>("scores").unwrap_err();
    assert_eq!(err.path().to_string(), "data.scores[1]");
}

#[test]
fn unselected_field_is_missing() {
    assert_eq!(
        review().get::<i32>("votes"),
        Err(DecodingError::MissingField {
            field_name: "votes".to_string(),
            path: ResponsePath::root(),
        }),
    );
}

#[test]
fn objects_convert_back_to_json() {
    let json: serde_json::Value = ResponseValue::Object(review())
        .to_json()
        .unwrap();

    assert_eq!(json["stars"], serde_json::json!(5));
    assert_eq!(json["scores"], serde_json::json!([1.5, null, 3]));
}

#[test]
fn non_finite_floats_have_no_json_form() {
    let value = ResponseValue::List(vec![
        ResponseValue::Leaf(Value::Float(1.0)),
        ResponseValue::Leaf(Value::Float(f64::NAN)),
    ]);

    assert!(matches!(value.to_json(), Err(EncodingError::NonFiniteFloat(f)) if f.is_nan()));
    assert!(matches!(
        serde_json::Value::from_response_value(&value, &ResponsePath::root()),
        Err(DecodingError::UnexpectedValue { found: "list", .. }),
    ));
}

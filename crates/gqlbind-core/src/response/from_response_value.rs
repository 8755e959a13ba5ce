use crate::decoder::DecodingError;
use crate::response::ResponsePath;
use crate::response::ResponseValue;
use crate::response::TypedObject;
use crate::Value;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;

type Result<T> = std::result::Result<T, DecodingError>;

/// Typed extraction from a decoded [`ResponseValue`].
///
/// Generated client types implement this for their object types and for the
/// closed enums that stand in for interfaces and unions, dispatching on
/// [`TypedObject::typename()`].
pub trait FromResponseValue: Sized {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self>;
}

fn unexpected(expected: &str, value: &ResponseValue, path: &ResponsePath) -> DecodingError {
    DecodingError::UnexpectedValue {
        expected: expected.to_string(),
        found: value.kind_name(),
        path: path.clone(),
    }
}

fn leaf<'a>(
    expected: &str,
    value: &'a ResponseValue,
    path: &ResponsePath,
) -> Result<&'a Value> {
    value.as_leaf().ok_or_else(|| unexpected(expected, value, path))
}

impl<T: FromResponseValue> FromResponseValue for Option<T> {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        match value {
            ResponseValue::Null => Ok(None),
            value => T::from_response_value(value, path).map(Some),
        }
    }
}

impl<T: FromResponseValue> FromResponseValue for Vec<T> {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        let items = value.as_list().ok_or_else(|| unexpected("a list", value, path))?;
        items.iter()
            .enumerate()
            .map(|(idx, item)| T::from_response_value(item, &path.join(idx)))
            .collect()
    }
}

impl FromResponseValue for bool {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        leaf("a boolean", value, path)?
            .as_bool()
            .ok_or_else(|| unexpected("a boolean", value, path))
    }
}

impl FromResponseValue for i32 {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        leaf("an int", value, path)?
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| unexpected("a 32-bit int", value, path))
    }
}

impl FromResponseValue for i64 {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        leaf("an int", value, path)?
            .as_i64()
            .ok_or_else(|| unexpected("an int", value, path))
    }
}

impl FromResponseValue for f64 {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        leaf("a float", value, path)?
            .as_f64()
            .ok_or_else(|| unexpected("a float", value, path))
    }
}

impl FromResponseValue for String {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        leaf("a string", value, path)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| unexpected("a string", value, path))
    }
}

impl FromResponseValue for DateTime<FixedOffset> {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        match leaf("a date-time", value, path)? {
            Value::DateTime(dt) => Ok(*dt),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map_err(|_| unexpected("an RFC 3339 date-time", value, path)),
            _ => Err(unexpected("a date-time", value, path)),
        }
    }
}

impl FromResponseValue for NaiveDate {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        match leaf("a date", value, path)? {
            Value::Date(date) => Ok(*date),
            Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| unexpected("a `YYYY-MM-DD` date", value, path)),
            _ => Err(unexpected("a date", value, path)),
        }
    }
}

impl FromResponseValue for Value {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        match value {
            ResponseValue::Null => Ok(Value::Null),
            ResponseValue::Leaf(leaf) => Ok(leaf.clone()),
            _ => Err(unexpected("a leaf value", value, path)),
        }
    }
}

impl FromResponseValue for serde_json::Value {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        match value {
            ResponseValue::Leaf(Value::Json(json)) => Ok(json.clone()),
            value => value.to_json().map_err(|err| {
                tracing::warn!(%err, %path, "response value has no JSON form");
                unexpected("a JSON-encodable value", value, path)
            }),
        }
    }
}

impl FromResponseValue for TypedObject {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self> {
        value.as_object()
            .cloned()
            .ok_or_else(|| unexpected("an object", value, path))
    }
}

impl FromResponseValue for ResponseValue {
    fn from_response_value(value: &ResponseValue, _path: &ResponsePath) -> Result<Self> {
        Ok(value.clone())
    }
}

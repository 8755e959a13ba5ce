use crate::literal;
use crate::literal::EncodingError;
use crate::Value;
use chrono::DateTime;
use chrono::NaiveDate;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts values of one scalar type between their Rust representation,
/// GraphQL literal text, and JSON.
///
/// Codecs are registered by scalar name on a
/// [`SchemaRegistryBuilder`](crate::schema::SchemaRegistryBuilder) and shared
/// by every request built against the resulting registry.
pub trait ScalarCodec: std::fmt::Debug + Send + Sync {
    /// Encode `value` as GraphQL literal text for a bind parameter.
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError>;

    /// Encode `value` as the JSON sent for a GraphQL variable.
    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError>;

    /// Decode a response leaf.
    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError>;
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{0}")]
pub struct ScalarDecodeError(pub String);
impl ScalarDecodeError {
    fn expected(what: &str, json: &serde_json::Value) -> Self {
        Self(format!("expected {what} but found `{json}`"))
    }
}

fn mismatch(expected: &str, value: &Value) -> EncodingError {
    EncodingError::TypeMismatch {
        expected: expected.to_string(),
        found: value.kind_name(),
    }
}

fn check_int(value: i64) -> Result<i64, EncodingError> {
    i32::try_from(value)
        .map(i64::from)
        .map_err(|_| EncodingError::IntOutOfRange(value))
}

#[derive(Debug, Default)]
pub struct IntCodec;
impl ScalarCodec for IntCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::Int(i) => Ok(check_int(*i)?.to_string()),
            _ => Err(mismatch("Int", value)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        match value {
            Value::Int(i) => Ok(serde_json::Value::from(check_int(*i)?)),
            _ => Err(mismatch("Int", value)),
        }
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        json.as_i64()
            .filter(|i| i32::try_from(*i).is_ok())
            .map(Value::Int)
            .ok_or_else(|| ScalarDecodeError::expected("a 32-bit integer", json))
    }
}

/// `Int` values are accepted wherever a `Float` is expected.
#[derive(Debug, Default)]
pub struct FloatCodec;
impl ScalarCodec for FloatCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::Float(f) => literal::format_float(*f),
            Value::Int(i) => Ok(i.to_string()),
            _ => Err(mismatch("Float", value)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        match value {
            Value::Float(_) | Value::Int(_) => value.to_json(),
            _ => Err(mismatch("Float", value)),
        }
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        json.as_f64()
            .map(Value::Float)
            .ok_or_else(|| ScalarDecodeError::expected("a number", json))
    }
}

#[derive(Debug, Default)]
pub struct StringCodec;
impl ScalarCodec for StringCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::String(s) => Ok(literal::quote_string(s)),
            _ => Err(mismatch("String", value)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        match value {
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            _ => Err(mismatch("String", value)),
        }
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        json.as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| ScalarDecodeError::expected("a string", json))
    }
}

#[derive(Debug, Default)]
pub struct BooleanCodec;
impl ScalarCodec for BooleanCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(mismatch("Boolean", value)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        match value {
            Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            _ => Err(mismatch("Boolean", value)),
        }
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        json.as_bool()
            .map(Value::Bool)
            .ok_or_else(|| ScalarDecodeError::expected("a boolean", json))
    }
}

/// IDs serialize as strings but accept integers on input.
#[derive(Debug, Default)]
pub struct IdCodec;
impl ScalarCodec for IdCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::String(s) => Ok(literal::quote_string(s)),
            Value::Int(i) => Ok(i.to_string()),
            _ => Err(mismatch("ID", value)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        match value {
            Value::String(s) => Ok(serde_json::Value::String(s.clone())),
            Value::Int(i) => Ok(serde_json::Value::String(i.to_string())),
            _ => Err(mismatch("ID", value)),
        }
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        match json {
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() =>
                Ok(Value::String(n.to_string())),
            _ => Err(ScalarDecodeError::expected("a string or integer ID", json)),
        }
    }
}

/// Passthrough codec for JSON-document scalars (`JSON`, `Object`). Any value
/// is accepted and response leaves are kept as raw JSON.
#[derive(Debug, Default)]
pub struct JsonCodec;
impl ScalarCodec for JsonCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::Json(json) => literal::json_to_literal(json),
            other => literal::encode_untyped(other),
        }
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        value.to_json()
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        Ok(Value::Json(json.clone()))
    }
}

/// RFC 3339 timestamps.
#[derive(Debug, Default)]
pub struct DateTimeCodec;
impl DateTimeCodec {
    fn to_text(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::DateTime(dt) => Ok(dt.to_rfc3339()),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|_| s.clone())
                .map_err(|err| EncodingError::InvalidScalar {
                    reason: err.to_string(),
                    scalar: "DateTime".to_string(),
                }),
            _ => Err(mismatch("DateTime", value)),
        }
    }
}
impl ScalarCodec for DateTimeCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        Ok(literal::quote_string(&self.to_text(value)?))
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        Ok(serde_json::Value::String(self.to_text(value)?))
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        let text = json.as_str()
            .ok_or_else(|| ScalarDecodeError::expected("an RFC 3339 string", json))?;
        DateTime::parse_from_rfc3339(text)
            .map(Value::DateTime)
            .map_err(|err| ScalarDecodeError(format!("`{text}`: {err}")))
    }
}

/// Calendar dates formatted as `YYYY-MM-DD`.
#[derive(Debug, Default)]
pub struct DateCodec;
impl DateCodec {
    fn to_text(&self, value: &Value) -> Result<String, EncodingError> {
        match value {
            Value::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(|_| s.clone())
                .map_err(|err| EncodingError::InvalidScalar {
                    reason: err.to_string(),
                    scalar: "Date".to_string(),
                }),
            _ => Err(mismatch("Date", value)),
        }
    }
}
impl ScalarCodec for DateCodec {
    fn encode_literal(&self, value: &Value) -> Result<String, EncodingError> {
        Ok(literal::quote_string(&self.to_text(value)?))
    }

    fn to_json(&self, value: &Value) -> Result<serde_json::Value, EncodingError> {
        Ok(serde_json::Value::String(self.to_text(value)?))
    }

    fn decode(&self, json: &serde_json::Value) -> Result<Value, ScalarDecodeError> {
        let text = json.as_str()
            .ok_or_else(|| ScalarDecodeError::expected("a `YYYY-MM-DD` string", json))?;
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|err| ScalarDecodeError(format!("`{text}`: {err}")))
    }
}

use crate::literal::EncodingError;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use indexmap::IndexMap;

/// A runtime value supplied by client code for a bind parameter or a GraphQL
/// variable, and produced by scalar codecs when decoding response leaves.
///
/// [`encode_literal()`](crate::literal::encode_literal) is total over this
/// type: every variant either encodes to GraphQL literal text or yields an
/// [`EncodingError`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Enum(String),
    List(Vec<Value>),
    /// An input object. Field order is preserved when encoding.
    Object(IndexMap<String, Value>),
    /// A raw JSON document, used for `JSON`/`Object`-style custom scalars.
    Json(serde_json::Value),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}
impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Numeric view of this value. `Int`s widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        if let Self::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Self::List(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }

    /// String view of `String` and `Enum` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert a JSON value without any type information. Strings stay
    /// strings (there is no way to tell an enum apart without a schema) and
    /// integral numbers that fit an `i64` become `Int`s.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) =>
                Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(entries) =>
                Self::Object(entries.iter().map(|(key, value)|
                    (key.clone(), Self::from_json(value))
                ).collect()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Object(_) => "input object",
            Self::Json(_) => "JSON document",
            Self::DateTime(_) => "date-time",
            Self::Date(_) => "date",
        }
    }

    /// Convert this value to JSON without any type information. This is how
    /// GraphQL variables travel to the server.
    pub fn to_json(&self) -> Result<serde_json::Value, EncodingError> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or(EncodingError::NonFiniteFloat(*f))?,
            Self::String(s) | Self::Enum(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(
                items.iter()
                    .map(Self::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Object(fields) => {
                let mut map = serde_json::Map::with_capacity(fields.len());
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(map)
            },
            Self::Json(json) => json.clone(),
            Self::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Self::Date(date) => serde_json::Value::String(
                date.format("%Y-%m-%d").to_string(),
            ),
        })
    }
}
impl std::convert::From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl std::convert::From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}
impl std::convert::From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl std::convert::From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl std::convert::From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl std::convert::From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl std::convert::From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}
impl std::convert::From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}
impl std::convert::From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}
impl<T: Into<Value>> std::convert::From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
impl<T: Into<Value>> std::convert::From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

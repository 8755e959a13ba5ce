use crate::decoder::DecodingError;
use crate::literal::EncodingError;
use crate::response::FromResponseValue;
use crate::response::ResponsePath;
use crate::Value;
use indexmap::IndexMap;

/// A decoded response object: its concrete GraphQL type and its fields,
/// keyed by response key in selection order.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObject {
    pub(crate) fields: IndexMap<String, ResponseValue>,
    pub(crate) typename: String,
}
impl TypedObject {
    pub fn new(typename: impl Into<String>) -> Self {
        Self {
            fields: IndexMap::new(),
            typename: typename.into(),
        }
    }

    /// The value decoded for `response_key`. Fields that were selected but
    /// missing from the response are present here as
    /// [`ResponseValue::Null`].
    pub fn field(&self, response_key: &str) -> Option<&ResponseValue> {
        self.fields.get(response_key)
    }

    pub fn fields(&self) -> &IndexMap<String, ResponseValue> {
        &self.fields
    }

    /// Extract `response_key` as a `T`.
    pub fn get<T: FromResponseValue>(&self, response_key: &str) -> Result<T, DecodingError> {
        self.get_at(response_key, &ResponsePath::root())
    }

    /// Like [`TypedObject::get()`], for an object found at `path`. Used by
    /// nested [`FromResponseValue`] impls so errors report the full path.
    pub fn get_at<T: FromResponseValue>(
        &self,
        response_key: &str,
        path: &ResponsePath,
    ) -> Result<T, DecodingError> {
        let field_path = path.join(response_key);
        let value = self.fields.get(response_key).ok_or_else(|| DecodingError::MissingField {
            field_name: response_key.to_string(),
            path: path.clone(),
        })?;
        T::from_response_value(value, &field_path)
    }

    pub fn typename(&self) -> &str {
        self.typename.as_str()
    }

    pub fn with_field(mut self, response_key: impl Into<String>, value: ResponseValue) -> Self {
        self.fields.insert(response_key.into(), value);
        self
    }
}

/// Any value found in a decoded response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseValue {
    Null,
    Leaf(Value),
    List(Vec<ResponseValue>),
    Object(TypedObject),
}
impl ResponseValue {
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResponseValue]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Leaf(value) => value.kind_name(),
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Convert back to plain JSON, dropping type names. Fails only for leaves
    /// JSON cannot hold, such as non-finite floats.
    pub fn to_json(&self) -> Result<serde_json::Value, EncodingError> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Leaf(value) => value.to_json()?,
            Self::List(items) => serde_json::Value::Array(
                items.iter()
                    .map(Self::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Object(object) => {
                let mut map = serde_json::Map::with_capacity(object.fields.len());
                for (key, value) in &object.fields {
                    map.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(map)
            },
        })
    }
}
impl std::convert::From<Value> for ResponseValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            value => Self::Leaf(value),
        }
    }
}
impl std::convert::From<TypedObject> for ResponseValue {
    fn from(object: TypedObject) -> Self {
        Self::Object(object)
    }
}

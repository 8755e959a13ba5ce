use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// The JSON object a GraphQL server answers with:
/// `{"data": ..., "errors": [...], "extensions": {...}}`.
///
/// Each member is optional on the wire. A missing or `null` `errors` member
/// deserializes to an empty list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}
impl ResponseEnvelope {
    pub fn from_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Indicates whether the body looks like a GraphQL response at all, as
    /// opposed to an arbitrary JSON object.
    pub fn is_graphql_response(&self) -> bool {
        self.data.is_some() || self.has_errors()
    }
}

/// One entry of a response's `errors` list.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ResponseError {
    pub message: String,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}
impl ResponseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: None,
            extensions: None,
        }
    }
}
impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at ")?;
            for (idx, segment) in path.iter().enumerate() {
                match segment {
                    PathSegment::Index(i) => write!(f, "[{i}]")?,
                    PathSegment::Key(key) if idx == 0 => write!(f, "{key}")?,
                    PathSegment::Key(key) => write!(f, ".{key}")?,
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A position in the request document an error refers to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
    #[serde(default, rename = "sourceName", skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

/// One step of a response path: an object key or a list index.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}
impl std::convert::From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}
impl std::convert::From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

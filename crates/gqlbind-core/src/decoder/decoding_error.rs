use crate::response::ResponsePath;
use crate::schema::ScalarDecodeError;
use thiserror::Error;

/// A response did not match the shape it was decoded against.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodingError {
    #[error("scalar `{scalar}` at `{path}` could not be decoded: {source}")]
    InvalidScalar {
        path: ResponsePath,
        scalar: String,
        source: ScalarDecodeError,
    },

    #[error("polymorphic object at `{path}` has no `{discriminator}` field")]
    MissingDiscriminator {
        discriminator: String,
        path: ResponsePath,
    },

    #[error("object at `{path}` has no field `{field_name}`")]
    MissingField {
        field_name: String,
        path: ResponsePath,
    },

    #[error("expected {expected} at `{path}` but the response holds {found}")]
    UnexpectedJsonShape {
        expected: &'static str,
        found: &'static str,
        path: ResponsePath,
    },

    #[error("expected {expected} at `{path}` but found a {found} value")]
    UnexpectedValue {
        expected: String,
        found: &'static str,
        path: ResponsePath,
    },

    #[error("`{typename}` at `{path}` is not a known variant of `{type_name}`")]
    UnknownDiscriminator {
        path: ResponsePath,
        type_name: String,
        typename: String,
    },

    #[error("`{value}` at `{path}` is not a value of enum `{enum_name}`")]
    UnknownEnumValue {
        enum_name: String,
        path: ResponsePath,
        value: String,
    },
}
impl DecodingError {
    /// Where in the response the error was found.
    pub fn path(&self) -> &ResponsePath {
        match self {
            Self::InvalidScalar { path, .. }
                | Self::MissingDiscriminator { path, .. }
                | Self::MissingField { path, .. }
                | Self::UnexpectedJsonShape { path, .. }
                | Self::UnexpectedValue { path, .. }
                | Self::UnknownDiscriminator { path, .. }
                | Self::UnknownEnumValue { path, .. } => path,
        }
    }
}

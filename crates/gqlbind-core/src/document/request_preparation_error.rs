use crate::literal::EncodingError;
use crate::OperationKind;
use thiserror::Error;

/// 1-based line and column of a position in request document text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SourceLocation {
    pub column: usize,
    pub line: usize,
}
impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors produced while assembling a
/// [`RequestTemplate`](crate::document::RequestTemplate) or binding values
/// into one.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RequestPreparationError {
    #[error("bind parameter `{name}` could not be encoded: {source}")]
    BindParameterMismatch {
        name: String,
        source: EncodingError,
    },

    #[error("variable `${name}` is declared more than once")]
    DuplicateVariableDefinition {
        name: String,
    },

    #[error("expected a name directly after `&` at {location}")]
    InvalidBindParameter {
        location: SourceLocation,
    },

    #[error("invalid number `{text}` at {location}")]
    InvalidNumber {
        location: SourceLocation,
        text: String,
    },

    #[error("no value was supplied for bind parameter `&{name}`")]
    MissingBindParameter {
        name: String,
    },

    #[error("no value was supplied for required variable `${name}`")]
    MissingVariable {
        name: String,
    },

    #[error("a request document may hold only one operation (found another at {location})")]
    MultipleOperations {
        location: SourceLocation,
    },

    #[error("the request is a {found} but a {expected} was expected")]
    OperationKindMismatch {
        expected: OperationKind,
        found: OperationKind,
    },

    #[error("response shape field `{field_name}` is not selected by the request fragment")]
    ShapeFieldNotInFragment {
        field_name: String,
    },

    #[error("`{delimiter}` opened at {location} is never closed")]
    UnclosedDelimiter {
        delimiter: char,
        location: SourceLocation,
    },

    #[error("variable `${name}` is used but never declared")]
    UndeclaredVariable {
        name: String,
    },

    #[error("unexpected character `{character}` at {location}")]
    UnexpectedCharacter {
        character: char,
        location: SourceLocation,
    },

    #[error("a value was supplied for `{name}`, which is neither a variable nor a bind parameter of this request")]
    UnexpectedParameter {
        name: String,
    },

    #[error("expected {expected} but found {found} at {location}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("the schema does not define a {kind} root type")]
    UnknownRootOperationType {
        kind: OperationKind,
    },

    #[error("variable `${variable_name}` is declared with `{type_name}`, which is not an input type of the schema")]
    UnknownVariableType {
        type_name: String,
        variable_name: String,
    },

    #[error("unterminated string starting at {location}")]
    UnterminatedString {
        location: SourceLocation,
    },

    #[error("value for variable `${name}` does not match its declared type: {source}")]
    VariableTypeMismatch {
        name: String,
        source: EncodingError,
    },
}

use crate::decoder::DecodingError;
use crate::response::ResponseError;
use crate::response::TypedObject;
use thiserror::Error;

/// A response decoded against a [`ResponseShape`](crate::shape::ResponseShape).
///
/// Data and errors are kept side by side: a server may return both when only
/// part of a request failed.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedResponse {
    pub(crate) data: Option<TypedObject>,
    pub(crate) decoding_errors: Vec<DecodingError>,
    pub(crate) errors: Vec<ResponseError>,
    pub(crate) extensions: Option<serde_json::Map<String, serde_json::Value>>,
}
impl DecodedResponse {
    pub fn data(&self) -> Option<&TypedObject> {
        self.data.as_ref()
    }

    /// Fields of a partial response that did not match the shape and were
    /// decoded as `null`. Only ever non-empty when [`Self::errors()`] is.
    pub fn decoding_errors(&self) -> &[DecodingError] {
        self.decoding_errors.as_slice()
    }

    pub fn errors(&self) -> &[ResponseError] {
        self.errors.as_slice()
    }

    pub fn extensions(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.extensions.as_ref()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The decoded data when the server reported no errors. Otherwise a
    /// [`RequestExecutionError`] carrying the errors and whatever data was
    /// decoded alongside them.
    pub fn into_result(self) -> Result<Option<TypedObject>, RequestExecutionError> {
        if self.errors.is_empty() {
            Ok(self.data)
        } else {
            Err(RequestExecutionError {
                decoding_errors: self.decoding_errors,
                errors: self.errors,
                partial_data: self.data,
            })
        }
    }
}

/// The server reported errors while executing a request.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{}", describe_errors(.errors))]
pub struct RequestExecutionError {
    pub(crate) decoding_errors: Vec<DecodingError>,
    pub(crate) errors: Vec<ResponseError>,
    pub(crate) partial_data: Option<TypedObject>,
}
impl RequestExecutionError {
    /// Parts of the partial data that could not be decoded and were nulled.
    pub fn decoding_errors(&self) -> &[DecodingError] {
        self.decoding_errors.as_slice()
    }

    pub fn errors(&self) -> &[ResponseError] {
        self.errors.as_slice()
    }

    pub fn into_partial_data(self) -> Option<TypedObject> {
        self.partial_data
    }

    /// Data the server returned alongside the errors, if any.
    pub fn partial_data(&self) -> Option<&TypedObject> {
        self.partial_data.as_ref()
    }
}

fn describe_errors(errors: &[ResponseError]) -> String {
    match errors {
        [] => "the server reported an error".to_string(),
        [only] => format!("the server reported an error: {only}"),
        [first, rest @ ..] => format!(
            "the server reported {} errors, the first being: {first}",
            rest.len() + 1,
        ),
    }
}

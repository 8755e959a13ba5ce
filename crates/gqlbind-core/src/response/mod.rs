//! Wire-level response envelopes and the typed object graph they decode into.

mod decoded_response;
mod from_response_value;
mod response_envelope;
mod response_path;
mod typed_object;

pub use decoded_response::DecodedResponse;
pub use decoded_response::RequestExecutionError;
pub use from_response_value::FromResponseValue;
pub use response_envelope::ErrorLocation;
pub use response_envelope::PathSegment;
pub use response_envelope::ResponseEnvelope;
pub use response_envelope::ResponseError;
pub use response_path::ResponsePath;
pub use typed_object::ResponseValue;
pub use typed_object::TypedObject;

#[cfg(test)]
mod tests;

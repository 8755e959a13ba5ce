//! The request/response engine behind `gqlbind`.
//!
//! Generated client code uses this crate to:
//!
//! - assemble a [`RequestTemplate`](document::RequestTemplate) from a partial
//!   request fragment and a [`ResponseShape`](shape::ResponseShape),
//! - bind GraphQL variables (`$name`) and client-side bind parameters
//!   (`&name`) into a [`BoundRequest`](binder::BoundRequest),
//! - execute it over a [`QueryTransport`](transport::QueryTransport) or a
//!   [`SubscriptionTransport`](transport::SubscriptionTransport),
//! - decode the response into a polymorphic [`TypedObject`](response::TypedObject)
//!   graph while keeping partial data when the server reports errors.

pub mod assignment;
pub mod binder;
pub mod decoder;
pub mod document;
mod executor;
pub mod literal;
mod operation_kind;
pub mod response;
pub mod schema;
pub mod shape;
pub mod transport;
#[cfg(test)]
mod test_utils;
pub mod types;
mod value;

pub use executor::ClientError;
pub use executor::RequestExecutor;
pub use executor::TypedSubscriptionListener;
pub use operation_kind::OperationKind;
pub use value::Value;

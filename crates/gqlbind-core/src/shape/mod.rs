//! Response shapes: the statically known structure of a response, used both
//! to render selection sets and to decode responses into typed objects.

mod field_shape;
mod object_shape;
mod response_shape;

pub use field_shape::FieldShape;
pub use field_shape::ShapeNode;
pub use object_shape::ObjectShape;
pub use object_shape::DEFAULT_DISCRIMINATOR;
pub use response_shape::ResponseShape;

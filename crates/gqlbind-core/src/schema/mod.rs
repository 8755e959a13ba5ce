mod scalar_codec;
#[allow(clippy::module_inception)]
mod schema_registry;
mod schema_registry_builder;
mod schema_type;

pub use scalar_codec::BooleanCodec;
pub use scalar_codec::DateCodec;
pub use scalar_codec::DateTimeCodec;
pub use scalar_codec::FloatCodec;
pub use scalar_codec::IdCodec;
pub use scalar_codec::IntCodec;
pub use scalar_codec::JsonCodec;
pub use scalar_codec::ScalarCodec;
pub use scalar_codec::ScalarDecodeError;
pub use scalar_codec::StringCodec;
pub use schema_registry::SchemaRegistry;
pub use schema_registry_builder::SchemaRegistryBuilder;
pub use schema_registry_builder::SchemaRegistryBuildError;
pub use schema_registry_builder::TypeValidationError;
pub use schema_type::EnumType;
pub use schema_type::FieldDefinition;
pub use schema_type::InputObjectType;
pub use schema_type::InputValueDefinition;
pub use schema_type::ObjectOrInterfaceType;
pub use schema_type::SchemaType;
pub use schema_type::UnionType;

use crate::types::TypeAnnotation;
use indexmap::IndexMap;

/// A named type known to a [`SchemaRegistry`](crate::schema::SchemaRegistry).
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaType {
    Enum(EnumType),
    InputObject(InputObjectType),
    Interface(ObjectOrInterfaceType),
    Object(ObjectOrInterfaceType),
    Scalar(String),
    Union(UnionType),
}
impl SchemaType {
    pub fn as_enum(&self) -> Option<&EnumType> {
        if let Self::Enum(enum_type) = self {
            Some(enum_type)
        } else {
            None
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        if let Self::InputObject(input_type) = self {
            Some(input_type)
        } else {
            None
        }
    }

    /// Unwrap the field-bearing definition of an object or interface type.
    pub fn as_object_or_interface(&self) -> Option<&ObjectOrInterfaceType> {
        match self {
            Self::Interface(data) | Self::Object(data) => Some(data),
            _ => None,
        }
    }

    /// Interfaces and unions are abstract: responses for them must carry a
    /// discriminator to select a concrete type.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Enum(_) => "enum",
            Self::InputObject(_) => "input object",
            Self::Interface(_) => "interface",
            Self::Object(_) => "object",
            Self::Scalar(_) => "scalar",
            Self::Union(_) => "union",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum(EnumType { name, .. }) => name,
            Self::InputObject(InputObjectType { name, .. }) => name,
            Self::Interface(ObjectOrInterfaceType { name, .. }) => name,
            Self::Object(ObjectOrInterfaceType { name, .. }) => name,
            Self::Scalar(name) => name,
            Self::Union(UnionType { name, .. }) => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub(super) name: String,
    pub(super) values: Vec<String>,
}
impl EnumType {
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The enum's values in schema definition order.
    pub fn values(&self) -> &[String] {
        self.values.as_slice()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectType {
    pub(super) fields: IndexMap<String, InputValueDefinition>,
    pub(super) name: String,
}
impl InputObjectType {
    pub fn fields(&self) -> &IndexMap<String, InputValueDefinition> {
        &self.fields
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A field argument or an input object field.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub(super) has_default: bool,
    pub(super) name: String,
    pub(super) type_annotation: TypeAnnotation,
}
impl InputValueDefinition {
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// A value is required when it is non-null and has no default.
    pub fn is_required(&self) -> bool {
        !self.type_annotation.nullable() && !self.has_default
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub(super) arguments: IndexMap<String, InputValueDefinition>,
    pub(super) name: String,
    pub(super) type_annotation: TypeAnnotation,
}
impl FieldDefinition {
    pub fn arguments(&self) -> &IndexMap<String, InputValueDefinition> {
        &self.arguments
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}

/// Data shared by object and interface type definitions.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectOrInterfaceType {
    pub(super) fields: IndexMap<String, FieldDefinition>,
    pub(super) interfaces: Vec<String>,
    pub(super) name: String,
}
impl ObjectOrInterfaceType {
    pub fn fields(&self) -> &IndexMap<String, FieldDefinition> {
        &self.fields
    }

    /// The interfaces this type declares it implements, in definition order.
    /// See [`SchemaRegistry::interfaces_of()`](crate::schema::SchemaRegistry::interfaces_of)
    /// for the transitive set.
    pub fn interface_names(&self) -> &[String] {
        self.interfaces.as_slice()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub(super) members: Vec<String>,
    pub(super) name: String,
}
impl UnionType {
    pub fn members(&self) -> &[String] {
        self.members.as_slice()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

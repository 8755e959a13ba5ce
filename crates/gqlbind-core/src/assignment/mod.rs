//! Validation of values assigned to interface-typed fields of generated
//! client types.
//!
//! A generated field bound to an interface accepts only values whose concrete
//! type implements every interface in the field's binding set. The set is
//! fixed per generated field rather than per nominal interface, so two fields
//! declared with the same interface may accept different values.

mod assignment_type_error;
mod field_binding;
mod interface_set;

pub use assignment_type_error::AssignmentTypeError;
pub use field_binding::FieldBinding;
pub use field_binding::ImplementsInterfaces;
pub use interface_set::InterfaceSet;

use crate::response::TypedObject;
use crate::schema::SchemaRegistry;
use crate::schema::SchemaType;

impl SchemaRegistry {
    /// The binding a field gets by default from the schema: the interface it
    /// is declared with plus every interface that one extends. `None` when
    /// the field is unknown or not interface-typed.
    pub fn declared_binding(&self, owner_type: &str, field_name: &str) -> Option<FieldBinding> {
        let field_def = self.field(owner_type, field_name)?;
        let interface_name = field_def.type_annotation().innermost_name();
        let Some(SchemaType::Interface(_)) = self.get_type(interface_name) else {
            return None;
        };

        let mut interfaces = InterfaceSet::from_iter(self.interfaces_of(interface_name));
        interfaces.insert(interface_name);
        Some(FieldBinding::new(owner_type, field_name, interfaces))
    }

    /// Check a decoded object against `binding`, taking the interfaces its
    /// concrete type implements from the schema.
    pub fn check_assign(
        &self,
        binding: &FieldBinding,
        value: Option<&TypedObject>,
    ) -> Result<(), AssignmentTypeError> {
        let value = value.map(|object| SchemaTypedObject {
            object,
            registry: self,
        });
        binding.check_assign(value.as_ref())
    }
}

struct SchemaTypedObject<'a> {
    object: &'a TypedObject,
    registry: &'a SchemaRegistry,
}
impl ImplementsInterfaces for SchemaTypedObject<'_> {
    fn concrete_type_name(&self) -> &str {
        self.object.typename()
    }

    fn implements_interface(&self, interface_name: &str) -> bool {
        self.registry.implements(self.object.typename(), interface_name)
    }
}

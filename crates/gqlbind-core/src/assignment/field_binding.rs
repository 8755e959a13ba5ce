use crate::assignment::AssignmentTypeError;
use crate::assignment::InterfaceSet;

/// Implemented by values that may be assigned to interface-typed fields:
/// generated object types, or decoded objects viewed through a schema.
pub trait ImplementsInterfaces {
    fn concrete_type_name(&self) -> &str;

    fn implements_interface(&self, interface_name: &str) -> bool;
}

/// Describes one interface-typed field of a generated type together with the
/// set of interfaces every value assigned to it must implement.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldBinding {
    field_name: String,
    owner_type: String,
    required: InterfaceSet,
}
impl FieldBinding {
    pub fn new(
        owner_type: impl Into<String>,
        field_name: impl Into<String>,
        required: InterfaceSet,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            owner_type: owner_type.into(),
            required,
        }
    }

    /// `None` is always accepted. Anything else must implement every
    /// interface in [`FieldBinding::required()`].
    pub fn check_assign<V>(&self, value: Option<&V>) -> Result<(), AssignmentTypeError>
    where
        V: ImplementsInterfaces + ?Sized,
    {
        let Some(value) = value else {
            return Ok(());
        };

        let missing: InterfaceSet = self.required.iter()
            .filter(|name| !value.implements_interface(name))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            owner_type = %self.owner_type,
            field_name = %self.field_name,
            concrete_type = value.concrete_type_name(),
            %missing,
            "rejected interface assignment",
        );
        Err(AssignmentTypeError {
            concrete_type: value.concrete_type_name().to_string(),
            field_name: self.field_name.clone(),
            missing,
            owner_type: self.owner_type.clone(),
            required: self.required.clone(),
        })
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    pub fn owner_type(&self) -> &str {
        self.owner_type.as_str()
    }

    pub fn required(&self) -> &InterfaceSet {
        &self.required
    }
}

use crate::assignment::InterfaceSet;
use thiserror::Error;

/// A value was assigned to an interface-typed field whose binding set its
/// concrete type does not fully implement.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "`{owner_type}.{field_name}` requires {required} but `{concrete_type}` does not \
    implement {missing}"
)]
pub struct AssignmentTypeError {
    pub concrete_type: String,
    pub field_name: String,
    pub missing: InterfaceSet,
    pub owner_type: String,
    pub required: InterfaceSet,
}

use crate::types::TypeAnnotation;
use crate::OperationKind;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::ops::Range;

/// An assembled request document together with everything needed to bind
/// values into it: the declared GraphQL variables and every occurrence of
/// every bind parameter.
///
/// Templates are immutable once assembled and may be bound any number of
/// times, from any number of threads.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestTemplate {
    pub(super) bind_parameters: IndexMap<String, BindParameter>,
    pub(super) document: String,
    pub(super) kind: OperationKind,
    pub(super) name: Option<String>,
    pub(super) variables: IndexMap<String, VariableDefinition>,
}
impl RequestTemplate {
    /// Bind parameters in order of first appearance in the document.
    pub fn bind_parameters(&self) -> &IndexMap<String, BindParameter> {
        &self.bind_parameters
    }

    /// The assembled document text, with bind parameters still in place.
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// GraphQL variables declared in the operation header, in declaration
    /// order.
    pub fn variables(&self) -> &IndexMap<String, VariableDefinition> {
        &self.variables
    }
}

/// A GraphQL variable declared in the operation header (`$name: Type`).
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub(super) has_default: bool,
    pub(super) name: String,
    pub(super) type_annotation: TypeAnnotation,
}
impl VariableDefinition {
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// A variable may be left out of a bind when it is nullable or declares a
    /// default value.
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

/// A client-side parameter written as `&name` in the document. Every
/// occurrence is replaced by a literal when the template is bound.
#[derive(Clone, Debug, PartialEq)]
pub struct BindParameter {
    pub(super) name: String,
    pub(super) occurrences: SmallVec<[BindOccurrence; 2]>,
}
impl BindParameter {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Occurrences in document order.
    pub fn occurrences(&self) -> &[BindOccurrence] {
        self.occurrences.as_slice()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BindOccurrence {
    pub(super) span: Range<usize>,
    pub(super) target_type: Option<TypeAnnotation>,
}
impl BindOccurrence {
    /// Byte range of `&name` within [`RequestTemplate::document()`].
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The input type expected at this position, when the schema registry
    /// could resolve it.
    pub fn target_type(&self) -> Option<&TypeAnnotation> {
        self.target_type.as_ref()
    }
}

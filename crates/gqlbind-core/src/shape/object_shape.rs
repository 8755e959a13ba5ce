use crate::shape::FieldShape;
use crate::shape::ShapeNode;
use indexmap::IndexMap;

/// The response field used to tell the concrete type of a polymorphic object
/// unless a shape says otherwise.
pub const DEFAULT_DISCRIMINATOR: &str = "__typename";

/// The expected structure of one object in a response.
///
/// Shapes for interface or union positions are polymorphic: they carry a
/// discriminator field and one variant shape per concrete type the client
/// knows how to decode. Fields of the polymorphic shape itself are shared by
/// every variant.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectShape {
    discriminator: Option<String>,
    fields: IndexMap<String, FieldShape>,
    type_name: String,
    variants: IndexMap<String, ObjectShape>,
}
impl ObjectShape {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            discriminator: None,
            fields: IndexMap::new(),
            type_name: type_name.into(),
            variants: IndexMap::new(),
        }
    }

    /// A shape for an interface or union type using the default
    /// discriminator.
    pub fn polymorphic(type_name: impl Into<String>) -> Self {
        Self::new(type_name).with_discriminator(DEFAULT_DISCRIMINATOR)
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// Fields keyed by response key, in selection order.
    pub fn fields(&self) -> &IndexMap<String, FieldShape> {
        &self.fields
    }

    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    /// Render this shape as GraphQL selection set text.
    pub fn selection_text(&self) -> String {
        let mut out = String::new();
        self.write_selection(&mut out);
        out
    }

    pub fn type_name(&self) -> &str {
        self.type_name.as_str()
    }

    pub fn variant(&self, type_name: &str) -> Option<&ObjectShape> {
        self.variants.get(type_name)
    }

    pub fn variants(&self) -> &IndexMap<String, ObjectShape> {
        &self.variants
    }

    pub fn with_discriminator(mut self, field_name: impl Into<String>) -> Self {
        self.discriminator = Some(field_name.into());
        self
    }

    pub fn with_field(mut self, field: FieldShape) -> Self {
        self.fields.insert(field.response_key().to_string(), field);
        self
    }

    pub fn with_leaf(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.with_field(FieldShape::leaf(name, type_name))
    }

    pub fn with_list(self, name: impl Into<String>, node: ShapeNode) -> Self {
        self.with_field(FieldShape::new(name, ShapeNode::list(node)))
    }

    pub fn with_object(self, name: impl Into<String>, shape: ObjectShape) -> Self {
        self.with_field(FieldShape::object(name, shape))
    }

    /// Add the shape decoded when the discriminator names `variant`'s type.
    /// Adding a variant makes this shape polymorphic.
    pub fn with_variant(mut self, variant: ObjectShape) -> Self {
        if self.discriminator.is_none() {
            self.discriminator = Some(DEFAULT_DISCRIMINATOR.to_string());
        }
        self.variants.insert(variant.type_name.clone(), variant);
        self
    }

    pub(super) fn write_selection(&self, out: &mut String) {
        let start_len = out.len();
        out.push('{');
        if let Some(discriminator) = &self.discriminator
            && !self.fields.contains_key(discriminator) {
            out.push(' ');
            out.push_str(discriminator);
        }
        for field in self.fields.values() {
            out.push(' ');
            field.write_selection(out);
        }
        // Variants without fields of their own are fully decoded from the
        // shared fields.
        for variant in self.variants.values().filter(|v| !v.fields.is_empty() || !v.variants.is_empty()) {
            out.push_str(" ... on ");
            out.push_str(&variant.type_name);
            out.push(' ');
            variant.write_selection(out);
        }
        // An empty selection set is not valid GraphQL.
        if out.len() == start_len + 1 {
            out.push_str(" __typename");
        }
        out.push_str(" }");
    }
}

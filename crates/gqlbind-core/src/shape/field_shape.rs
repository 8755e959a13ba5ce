use crate::shape::ObjectShape;

/// One field of an [`ObjectShape`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape {
    alias: Option<String>,
    arguments: Option<String>,
    name: String,
    node: ShapeNode,
}
impl FieldShape {
    pub fn new(name: impl Into<String>, node: ShapeNode) -> Self {
        Self {
            alias: None,
            arguments: None,
            name: name.into(),
            node,
        }
    }

    pub fn leaf(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, ShapeNode::leaf(type_name))
    }

    pub fn object(name: impl Into<String>, shape: ObjectShape) -> Self {
        Self::new(name, ShapeNode::Object(shape))
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Argument text rendered between parentheses after the field name. It may
    /// reference variables and bind parameters.
    pub fn arguments(&self) -> Option<&str> {
        self.arguments.as_deref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn node(&self) -> &ShapeNode {
        &self.node
    }

    /// The key under which this field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name.as_str())
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    pub(super) fn write_selection(&self, out: &mut String) {
        if let Some(alias) = &self.alias {
            out.push_str(alias);
            out.push_str(": ");
        }
        out.push_str(&self.name);
        if let Some(arguments) = &self.arguments {
            out.push('(');
            out.push_str(arguments);
            out.push(')');
        }
        if let Some(object_shape) = self.node.object_shape() {
            out.push(' ');
            object_shape.write_selection(out);
        }
    }
}

/// The value a field holds: a leaf, a list of nodes, or a nested object.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeNode {
    /// A scalar or enum leaf, decoded through the registry by `type_name`.
    Leaf {
        type_name: String,
    },
    List(Box<ShapeNode>),
    Object(ObjectShape),
}
impl ShapeNode {
    pub fn leaf(type_name: impl Into<String>) -> Self {
        Self::Leaf {
            type_name: type_name.into(),
        }
    }

    pub fn list(inner: ShapeNode) -> Self {
        Self::List(Box::new(inner))
    }

    /// The object shape at the bottom of any list levels, if this node is
    /// object-valued.
    pub fn object_shape(&self) -> Option<&ObjectShape> {
        match self {
            Self::Leaf { .. } => None,
            Self::List(inner) => inner.object_shape(),
            Self::Object(shape) => Some(shape),
        }
    }
}

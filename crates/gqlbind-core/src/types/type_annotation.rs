use crate::document::parser::Parser;
use crate::document::RequestPreparationError;
use graphql_parser::schema as ast;

/// Represents the annotated type of a [`VariableDefinition`](crate::document::VariableDefinition),
/// a field argument, or an input object field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeAnnotation {
    List {
        inner: Box<TypeAnnotation>,
        nullable: bool,
    },
    Named {
        name: String,
        nullable: bool,
    },
}
impl TypeAnnotation {
    /// A nullable reference to the named type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            nullable: true,
        }
    }

    /// A nullable list whose items are annotated with `inner`.
    pub fn list_of(inner: TypeAnnotation) -> Self {
        Self::List {
            inner: Box::new(inner),
            nullable: true,
        }
    }

    /// The same annotation with the outermost level made non-nullable.
    pub fn non_null(self) -> Self {
        match self {
            Self::List { inner, .. } => Self::List { inner, nullable: false },
            Self::Named { name, .. } => Self::Named { name, nullable: false },
        }
    }

    /// The same annotation with the outermost level made nullable.
    pub fn into_nullable(self) -> Self {
        match self {
            Self::List { inner, .. } => Self::List { inner, nullable: true },
            Self::Named { name, .. } => Self::Named { name, nullable: true },
        }
    }

    pub(crate) fn from_ast_type(ast_type: &ast::Type<'_, String>) -> Self {
        Self::from_ast_type_impl(ast_type, /* nullable = */ true)
    }

    fn from_ast_type_impl(ast_type: &ast::Type<'_, String>, nullable: bool) -> Self {
        match ast_type {
            ast::Type::ListType(inner) => Self::List {
                inner: Box::new(Self::from_ast_type_impl(inner, true)),
                nullable,
            },

            ast::Type::NamedType(name) => Self::Named {
                name: name.to_string(),
                nullable,
            },

            ast::Type::NonNullType(inner) =>
                Self::from_ast_type_impl(inner, false),
        }
    }

    /// Recursively unwrap list levels and return the innermost type name.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::List { inner, .. } => inner.innermost_name(),
            Self::Named { name, .. } => name.as_str(),
        }
    }

    /// The item annotation if this is a list annotation.
    pub fn list_item(&self) -> Option<&TypeAnnotation> {
        if let Self::List { inner, .. } = self {
            Some(inner)
        } else {
            None
        }
    }

    /// Indicates if this [`TypeAnnotation`] is [nullable or
    /// non-nullable](https://spec.graphql.org/October2021/#sec-Non-Null).
    pub fn nullable(&self) -> bool {
        match self {
            Self::List { nullable, .. } => *nullable,
            Self::Named { nullable, .. } => *nullable,
        }
    }
}
impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { inner, nullable } => write!(
                f,
                "[{inner}]{}",
                if *nullable { "" } else { "!" },
            ),

            Self::Named { name, nullable } => write!(
                f,
                "{name}{}",
                if *nullable { "" } else { "!" },
            ),
        }
    }
}
impl std::str::FromStr for TypeAnnotation {
    type Err = RequestPreparationError;

    /// Parse GraphQL type syntax such as `[Episode!]!`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Parser::new(text)?.parse_standalone_type()
    }
}

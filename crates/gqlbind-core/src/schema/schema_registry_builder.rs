use crate::schema::BooleanCodec;
use crate::schema::DateCodec;
use crate::schema::DateTimeCodec;
use crate::schema::EnumType;
use crate::schema::FieldDefinition;
use crate::schema::FloatCodec;
use crate::schema::IdCodec;
use crate::schema::InputObjectType;
use crate::schema::InputValueDefinition;
use crate::schema::IntCodec;
use crate::schema::JsonCodec;
use crate::schema::ObjectOrInterfaceType;
use crate::schema::ScalarCodec;
use crate::schema::SchemaRegistry;
use crate::schema::SchemaType;
use crate::schema::StringCodec;
use crate::schema::UnionType;
use crate::types::TypeAnnotation;
use crate::OperationKind;
use graphql_parser::schema as ast;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

type Result<T> = std::result::Result<T, SchemaRegistryBuildError>;

const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

/// Utility for building a [`SchemaRegistry`] from SDL documents and scalar
/// codecs.
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    codecs: HashMap<String, Arc<dyn ScalarCodec>>,
    mutation_type: Option<String>,
    query_type: Option<String>,
    sdl_loaded: bool,
    str_load_counter: u16,
    subscription_type: Option<String>,
    types: HashMap<String, SchemaType>,
}
impl SchemaRegistryBuilder {
    pub fn build(mut self) -> Result<SchemaRegistry> {
        if !self.sdl_loaded {
            return Ok(self.build_builtin());
        }

        let query_type = self.query_type.take()
            .or_else(|| self.default_root_type("Query"))
            .ok_or(SchemaRegistryBuildError::NoQueryOperationTypeDefined)?;
        let mutation_type = self.mutation_type.take()
            .or_else(|| self.default_root_type("Mutation"));
        let subscription_type = self.subscription_type.take()
            .or_else(|| self.default_root_type("Subscription"));

        let mut errors = vec![];
        for (kind, root_name) in [
            (OperationKind::Query, Some(&query_type)),
            (OperationKind::Mutation, mutation_type.as_ref()),
            (OperationKind::Subscription, subscription_type.as_ref()),
        ] {
            if let Some(root_name) = root_name
                && !matches!(self.types.get(root_name), Some(SchemaType::Object(_))) {
                errors.push(TypeValidationError::InvalidRootOperationType {
                    kind,
                    type_name: root_name.clone(),
                });
            }
        }
        self.validate_types(&mut errors);
        if !errors.is_empty() {
            return Err(SchemaRegistryBuildError::TypeValidationErrors { errors });
        }

        tracing::debug!(
            types = self.types.len(),
            codecs = self.codecs.len(),
            "built schema registry",
        );

        Ok(SchemaRegistry {
            codecs: self.codecs,
            mutation_type,
            query_type: Some(query_type),
            schema_aware: true,
            subscription_type,
            types: self.types,
        })
    }

    pub(super) fn build_builtin(self) -> SchemaRegistry {
        SchemaRegistry {
            codecs: self.codecs,
            mutation_type: None,
            query_type: None,
            schema_aware: false,
            subscription_type: None,
            types: self.types,
        }
    }

    /// A builder that knows the built-in scalars and carries the default
    /// codecs: the five built-in scalars, `JSON` and `Object` passthrough,
    /// `DateTime` and `Date`.
    pub fn new() -> Self {
        let mut codecs: HashMap<String, Arc<dyn ScalarCodec>> = HashMap::new();
        codecs.insert("Boolean".to_string(), Arc::new(BooleanCodec));
        codecs.insert("Date".to_string(), Arc::new(DateCodec));
        codecs.insert("DateTime".to_string(), Arc::new(DateTimeCodec));
        codecs.insert("Float".to_string(), Arc::new(FloatCodec));
        codecs.insert("ID".to_string(), Arc::new(IdCodec));
        codecs.insert("Int".to_string(), Arc::new(IntCodec));
        codecs.insert("JSON".to_string(), Arc::new(JsonCodec));
        codecs.insert("Object".to_string(), Arc::new(JsonCodec));
        codecs.insert("String".to_string(), Arc::new(StringCodec));

        let types = BUILTIN_SCALARS.iter()
            .map(|name| (name.to_string(), SchemaType::Scalar(name.to_string())))
            .collect();

        Self {
            codecs,
            mutation_type: None,
            query_type: None,
            sdl_loaded: false,
            str_load_counter: 0,
            subscription_type: None,
            types,
        }
    }

    pub fn load_file(
        self,
        file_path: impl AsRef<Path>,
    ) -> Result<Self> {
        self.load_files(vec![file_path])
    }

    pub fn load_files(
        mut self,
        file_paths: Vec<impl AsRef<Path>>,
    ) -> Result<Self> {
        for file_path in file_paths {
            let file_path = file_path.as_ref();
            let file_content = std::fs::read_to_string(file_path)
                .map_err(|err| SchemaRegistryBuildError::SchemaFileReadError {
                    file: file_path.to_path_buf(),
                    err: err.to_string(),
                })?;
            self = self.load_str(
                Some(file_path.to_path_buf()),
                file_content.as_str(),
            )?;
        }
        Ok(self)
    }

    pub fn load_str(
        mut self,
        file_path: Option<PathBuf>,
        content: &str,
    ) -> Result<Self> {
        let file_path =
            if let Some(file_path) = file_path {
                file_path
            } else {
                let ctr = self.str_load_counter;
                self.str_load_counter += 1;
                PathBuf::from(format!("str://{ctr}"))
            };

        let ast_doc =
            ast::parse_schema::<String>(content)
                .map_err(|err| SchemaRegistryBuildError::ParseError {
                    file: file_path.to_owned(),
                    err: err.to_string(),
                })?.into_static();

        for def in ast_doc.definitions {
            self.visit_ast_def(def)?;
        }
        self.sdl_loaded = true;

        tracing::trace!(file = %file_path.display(), "loaded schema document");
        Ok(self)
    }

    /// Register (or replace) the codec used for the scalar named
    /// `scalar_name`.
    pub fn with_scalar_codec(
        mut self,
        scalar_name: impl Into<String>,
        codec: impl ScalarCodec + 'static,
    ) -> Self {
        self.codecs.insert(scalar_name.into(), Arc::new(codec));
        self
    }

    fn default_root_type(&self, type_name: &str) -> Option<String> {
        match self.types.get(type_name) {
            Some(SchemaType::Object(_)) => Some(type_name.to_string()),
            _ => None,
        }
    }

    fn define_type(&mut self, schema_type: SchemaType) -> Result<()> {
        let type_name = schema_type.name().to_string();
        if BUILTIN_SCALARS.contains(&type_name.as_str()) {
            return Err(SchemaRegistryBuildError::RedefinitionOfBuiltinScalar {
                type_name,
            });
        }
        if type_name.starts_with("__") {
            return Err(SchemaRegistryBuildError::InvalidDunderPrefixedTypeName {
                type_name,
            });
        }
        if self.types.contains_key(&type_name) {
            return Err(SchemaRegistryBuildError::DuplicateTypeDefinition {
                type_name,
            });
        }
        self.types.insert(type_name, schema_type);
        Ok(())
    }

    fn extended_type(&mut self, type_name: &str) -> Result<&mut SchemaType> {
        self.types.get_mut(type_name).ok_or_else(||
            SchemaRegistryBuildError::ExtensionOfUndefinedType {
                type_name: type_name.to_string(),
            }
        )
    }

    fn validate_type_ref(
        &self,
        referenced_by: String,
        annot: &TypeAnnotation,
        expect_input: bool,
        errors: &mut Vec<TypeValidationError>,
    ) {
        let type_name = annot.innermost_name();
        match self.types.get(type_name) {
            None => errors.push(TypeValidationError::UndefinedTypeName {
                referenced_by,
                type_name: type_name.to_string(),
            }),

            Some(SchemaType::Enum(_) | SchemaType::Scalar(_)) => (),

            Some(SchemaType::InputObject(_)) if expect_input => (),

            Some(SchemaType::Interface(_) | SchemaType::Object(_) | SchemaType::Union(_))
                if !expect_input => (),

            Some(other) => errors.push(TypeValidationError::InvalidTypeKind {
                kind: other.kind_name(),
                referenced_by,
                type_name: type_name.to_string(),
            }),
        }
    }

    fn validate_types(&self, errors: &mut Vec<TypeValidationError>) {
        let mut type_names: Vec<&String> = self.types.keys().collect();
        type_names.sort_unstable();

        for type_name in type_names {
            match &self.types[type_name] {
                SchemaType::Enum(_) | SchemaType::Scalar(_) => (),

                SchemaType::InputObject(input_type) => {
                    for field in input_type.fields.values() {
                        self.validate_type_ref(
                            format!("{type_name}.{}", field.name),
                            &field.type_annotation,
                            /* expect_input = */ true,
                            errors,
                        );
                    }
                },

                SchemaType::Interface(data) | SchemaType::Object(data) => {
                    for iface_name in &data.interfaces {
                        if !matches!(self.types.get(iface_name), Some(SchemaType::Interface(_))) {
                            errors.push(TypeValidationError::ImplementsNonInterfaceType {
                                type_name: type_name.clone(),
                                interface_name: iface_name.clone(),
                            });
                        }
                    }
                    for field in data.fields.values() {
                        self.validate_type_ref(
                            format!("{type_name}.{}", field.name),
                            &field.type_annotation,
                            /* expect_input = */ false,
                            errors,
                        );
                        for arg in field.arguments.values() {
                            self.validate_type_ref(
                                format!("{type_name}.{}({}:)", field.name, arg.name),
                                &arg.type_annotation,
                                /* expect_input = */ true,
                                errors,
                            );
                        }
                    }
                },

                SchemaType::Union(union_type) => {
                    for member in &union_type.members {
                        if !matches!(self.types.get(member), Some(SchemaType::Object(_))) {
                            errors.push(TypeValidationError::InvalidUnionMember {
                                member_name: member.clone(),
                                union_name: type_name.clone(),
                            });
                        }
                    }
                },
            }
        }
    }

    fn visit_ast_def(&mut self, def: ast::Definition<'static, String>) -> Result<()> {
        use ast::Definition;
        match def {
            Definition::SchemaDefinition(schema_def) =>
                self.visit_ast_schemablock_def(schema_def),
            Definition::TypeDefinition(type_def) =>
                self.visit_ast_type_def(type_def),
            Definition::TypeExtension(type_ext) =>
                self.visit_ast_type_extension(type_ext),
            // Directive definitions are not needed to build or decode requests.
            Definition::DirectiveDefinition(_) => Ok(()),
        }
    }

    fn visit_ast_schemablock_def(
        &mut self,
        schema_def: ast::SchemaDefinition<'static, String>,
    ) -> Result<()> {
        for (kind, type_name, slot) in [
            (OperationKind::Query, schema_def.query, &mut self.query_type),
            (OperationKind::Mutation, schema_def.mutation, &mut self.mutation_type),
            (OperationKind::Subscription, schema_def.subscription, &mut self.subscription_type),
        ] {
            if let Some(type_name) = type_name {
                if slot.is_some() {
                    return Err(SchemaRegistryBuildError::DuplicateOperationDefinition {
                        kind,
                    });
                }
                *slot = Some(type_name);
            }
        }
        Ok(())
    }

    fn visit_ast_type_def(
        &mut self,
        type_def: ast::TypeDefinition<'static, String>,
    ) -> Result<()> {
        use ast::TypeDefinition;
        let schema_type = match type_def {
            TypeDefinition::Enum(enum_def) => SchemaType::Enum(EnumType {
                values: enum_def.values.into_iter().map(|v| v.name).collect(),
                name: enum_def.name,
            }),

            TypeDefinition::InputObject(input_def) =>
                SchemaType::InputObject(InputObjectType {
                    fields: input_values(input_def.fields),
                    name: input_def.name,
                }),

            TypeDefinition::Interface(iface_def) =>
                SchemaType::Interface(ObjectOrInterfaceType {
                    fields: field_defs(iface_def.fields),
                    interfaces: iface_def.implements_interfaces,
                    name: iface_def.name,
                }),

            TypeDefinition::Object(obj_def) =>
                SchemaType::Object(ObjectOrInterfaceType {
                    fields: field_defs(obj_def.fields),
                    interfaces: obj_def.implements_interfaces,
                    name: obj_def.name,
                }),

            TypeDefinition::Scalar(scalar_def) => SchemaType::Scalar(scalar_def.name),

            TypeDefinition::Union(union_def) => SchemaType::Union(UnionType {
                members: union_def.types,
                name: union_def.name,
            }),
        };
        self.define_type(schema_type)
    }

    fn visit_ast_type_extension(
        &mut self,
        ext: ast::TypeExtension<'static, String>,
    ) -> Result<()> {
        use ast::TypeExtension;
        match ext {
            TypeExtension::Enum(enum_ext) => {
                let SchemaType::Enum(enum_type) = self.extended_type(&enum_ext.name)? else {
                    return Err(invalid_extension(enum_ext.name, "enum"));
                };
                enum_type.values.extend(enum_ext.values.into_iter().map(|v| v.name));
            },

            TypeExtension::InputObject(input_ext) => {
                let SchemaType::InputObject(input_type) = self.extended_type(&input_ext.name)? else {
                    return Err(invalid_extension(input_ext.name, "input object"));
                };
                input_type.fields.extend(input_values(input_ext.fields));
            },

            TypeExtension::Interface(iface_ext) => {
                let SchemaType::Interface(data) = self.extended_type(&iface_ext.name)? else {
                    return Err(invalid_extension(iface_ext.name, "interface"));
                };
                data.fields.extend(field_defs(iface_ext.fields));
                data.interfaces.extend(iface_ext.implements_interfaces);
            },

            TypeExtension::Object(obj_ext) => {
                let SchemaType::Object(data) = self.extended_type(&obj_ext.name)? else {
                    return Err(invalid_extension(obj_ext.name, "object"));
                };
                data.fields.extend(field_defs(obj_ext.fields));
                data.interfaces.extend(obj_ext.implements_interfaces);
            },

            TypeExtension::Scalar(scalar_ext) => {
                let SchemaType::Scalar(_) = self.extended_type(&scalar_ext.name)? else {
                    return Err(invalid_extension(scalar_ext.name, "scalar"));
                };
            },

            TypeExtension::Union(union_ext) => {
                let SchemaType::Union(union_type) = self.extended_type(&union_ext.name)? else {
                    return Err(invalid_extension(union_ext.name, "union"));
                };
                union_type.members.extend(union_ext.types);
            },
        }
        Ok(())
    }
}
impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn field_defs(
    fields: Vec<ast::Field<'static, String>>,
) -> IndexMap<String, FieldDefinition> {
    fields.into_iter().map(|field| (
        field.name.clone(),
        FieldDefinition {
            arguments: input_values(field.arguments),
            type_annotation: TypeAnnotation::from_ast_type(&field.field_type),
            name: field.name,
        },
    )).collect()
}

fn input_values(
    values: Vec<ast::InputValue<'static, String>>,
) -> IndexMap<String, InputValueDefinition> {
    values.into_iter().map(|input_val| (
        input_val.name.clone(),
        InputValueDefinition {
            has_default: input_val.default_value.is_some(),
            type_annotation: TypeAnnotation::from_ast_type(&input_val.value_type),
            name: input_val.name,
        },
    )).collect()
}

fn invalid_extension(type_name: String, extension_kind: &'static str) -> SchemaRegistryBuildError {
    SchemaRegistryBuildError::InvalidExtensionType {
        extension_kind,
        type_name,
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaRegistryBuildError {
    #[error("The {kind} root operation type was defined more than once")]
    DuplicateOperationDefinition {
        kind: OperationKind,
    },

    #[error("Multiple GraphQL types named `{type_name}` were defined")]
    DuplicateTypeDefinition {
        type_name: String,
    },

    #[error("Attempted to extend `{type_name}`, which is not defined elsewhere")]
    ExtensionOfUndefinedType {
        type_name: String,
    },

    #[error("Attempted to extend `{type_name}` with an {extension_kind} extension, but it is a different kind of type")]
    InvalidExtensionType {
        extension_kind: &'static str,
        type_name: String,
    },

    #[error("Type names must not start with `__`: `{type_name}`")]
    InvalidDunderPrefixedTypeName {
        type_name: String,
    },

    #[error("Attempted to build a schema that has no Query operation type defined")]
    NoQueryOperationTypeDefined,

    #[error("Error parsing schema file `{}`: {err}", file.display())]
    ParseError {
        file: PathBuf,
        err: String,
    },

    #[error("Attempted to redefine the builtin scalar `{type_name}`")]
    RedefinitionOfBuiltinScalar {
        type_name: String,
    },

    #[error("Failure while trying to read schema file `{}`: {err}", file.display())]
    SchemaFileReadError {
        file: PathBuf,
        err: String,
    },

    #[error(
        "Encountered the following type-validation errors while building the \
        schema registry:\n\n{}",
        errors.iter()
            .map(|s| format!("  * {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )]
    TypeValidationErrors {
        errors: Vec<TypeValidationError>,
    },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TypeValidationError {
    #[error("`{type_name}` declares that it implements `{interface_name}`, which is not an interface type")]
    ImplementsNonInterfaceType {
        interface_name: String,
        type_name: String,
    },

    #[error("The {kind} root operation type `{type_name}` is not a defined object type")]
    InvalidRootOperationType {
        kind: OperationKind,
        type_name: String,
    },

    #[error("`{referenced_by}` refers to `{type_name}`, which is an {kind} type and not allowed in that position")]
    InvalidTypeKind {
        kind: &'static str,
        referenced_by: String,
        type_name: String,
    },

    #[error("Union `{union_name}` lists `{member_name}`, which is not an object type")]
    InvalidUnionMember {
        member_name: String,
        union_name: String,
    },

    #[error("`{referenced_by}` refers to an undefined type named `{type_name}`")]
    UndefinedTypeName {
        referenced_by: String,
        type_name: String,
    },
}

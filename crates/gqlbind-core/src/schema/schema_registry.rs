use crate::schema::FieldDefinition;
use crate::schema::ScalarCodec;
use crate::schema::SchemaRegistryBuilder;
use crate::schema::SchemaType;
use crate::OperationKind;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of the schema a client was generated against, plus the
/// scalar codecs used to encode and decode its scalar types.
///
/// A registry built without any SDL (see [`SchemaRegistry::builtin()`]) knows
/// only the built-in scalars. Requests prepared against it are not
/// type-checked beyond what runtime values carry themselves.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    pub(super) codecs: HashMap<String, Arc<dyn ScalarCodec>>,
    pub(super) mutation_type: Option<String>,
    pub(super) query_type: Option<String>,
    pub(super) schema_aware: bool,
    pub(super) subscription_type: Option<String>,
    pub(super) types: HashMap<String, SchemaType>,
}
impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// A registry with no schema loaded and the default scalar codecs.
    pub fn builtin() -> Self {
        SchemaRegistryBuilder::new().build_builtin()
    }

    pub fn codec(&self, scalar_name: &str) -> Option<&dyn ScalarCodec> {
        self.codecs.get(scalar_name).map(|codec| codec.as_ref())
    }

    /// Look up a field of an object or interface type. `__typename` is
    /// available on every composite type (including unions) and resolves to
    /// `None` here; callers treat it as a `String!` leaf.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.types.get(type_name)?
            .as_object_or_interface()?
            .fields()
            .get(field_name)
    }

    pub fn get_type(&self, type_name: &str) -> Option<&SchemaType> {
        self.types.get(type_name)
    }

    /// Indicates whether `type_name` implements `interface_name`, directly or
    /// through another interface.
    pub fn implements(&self, type_name: &str, interface_name: &str) -> bool {
        self.interfaces_of(type_name).contains(interface_name)
    }

    /// The transitive set of interfaces implemented by `type_name`.
    pub fn interfaces_of(&self, type_name: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending = vec![type_name];
        while let Some(name) = pending.pop() {
            let Some(data) = self.types.get(name).and_then(SchemaType::as_object_or_interface) else {
                continue;
            };
            for iface_name in data.interface_names() {
                if found.insert(iface_name.clone()) {
                    pending.push(iface_name.as_str());
                }
            }
        }
        found
    }

    pub fn is_schema_aware(&self) -> bool {
        self.schema_aware
    }

    /// Object types a value of `type_name` may have at runtime: the union's
    /// members, the implementors of an interface, or the type itself for
    /// object types. Results are sorted by name.
    pub fn possible_types(&self, type_name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = match self.types.get(type_name) {
            Some(SchemaType::Union(union_type)) =>
                union_type.members().iter().map(String::as_str).collect(),

            Some(SchemaType::Interface(_)) => self.types.values()
                .filter(|t| matches!(t, SchemaType::Object(_)))
                .map(SchemaType::name)
                .filter(|name| self.implements(name, type_name))
                .collect(),

            Some(SchemaType::Object(obj)) => vec![obj.name()],

            _ => vec![],
        };
        names.sort_unstable();
        names
    }

    /// The name of the root type operations of `kind` select from.
    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }
}
impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

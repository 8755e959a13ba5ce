use crate::document::parser::ParsedDirective;
use crate::document::parser::ParsedDocument;
use crate::document::parser::ParsedSelection;
use crate::document::parser::ParsedSelectionSet;
use crate::document::parser::ParsedValue;
use crate::document::parser::Parser;
use crate::document::BindOccurrence;
use crate::document::BindParameter;
use crate::document::RequestPreparationError;
use crate::document::RequestTemplate;
use crate::document::VariableDefinition;
use crate::schema::SchemaRegistry;
use crate::schema::SchemaType;
use crate::shape::ResponseShape;
use crate::types::TypeAnnotation;
use crate::OperationKind;
use indexmap::IndexMap;
use indexmap::IndexSet;
use smallvec::smallvec;

type Result<T> = std::result::Result<T, Vec<RequestPreparationError>>;

impl RequestTemplate {
    /// Assemble a request from a partial document `fragment` and the
    /// `shape` of the response the caller expects.
    ///
    /// `fragment` may be a complete operation, a bare selection set, or bare
    /// root fields; a missing operation header is synthesized from `kind`.
    /// Every root field of the fragment that lacks a selection set and
    /// matches an object-valued root field of `shape` receives the shape's
    /// selection set.
    pub fn assemble(
        registry: &SchemaRegistry,
        fragment: &str,
        shape: Option<&ResponseShape>,
        kind: OperationKind,
    ) -> Result<Self> {
        let parsed = parse(fragment)?;

        let mut errors = vec![];
        if let Some(found) = parsed.operation.kind
            && found != kind {
            errors.push(RequestPreparationError::OperationKindMismatch {
                expected: kind,
                found,
            });
        }
        let edits = plan_edits(&parsed, shape, kind, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        let document = apply_edits(fragment, edits);

        let assembled = parse(&document)?;
        let mut analyzer = DocumentAnalyzer::new(registry);
        analyzer.visit_document(&assembled, kind, &mut errors);

        let mut variables = IndexMap::new();
        for var_def in &assembled.operation.variables {
            if variables.contains_key(&var_def.name) {
                errors.push(RequestPreparationError::DuplicateVariableDefinition {
                    name: var_def.name.clone(),
                });
                continue;
            }
            if registry.is_schema_aware() {
                let type_name = var_def.type_annotation.innermost_name();
                let is_input_type = matches!(
                    registry.get_type(type_name),
                    Some(SchemaType::Enum(_) | SchemaType::InputObject(_) | SchemaType::Scalar(_)),
                );
                if !is_input_type {
                    errors.push(RequestPreparationError::UnknownVariableType {
                        type_name: type_name.to_string(),
                        variable_name: var_def.name.clone(),
                    });
                }
            }
            variables.insert(var_def.name.clone(), VariableDefinition {
                has_default: var_def.default_value.is_some(),
                name: var_def.name.clone(),
                type_annotation: var_def.type_annotation.clone(),
            });
        }

        for var_name in &analyzer.variable_refs {
            if !variables.contains_key(var_name) {
                errors.push(RequestPreparationError::UndeclaredVariable {
                    name: var_name.clone(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        tracing::debug!(
            %kind,
            name = ?assembled.operation.name,
            variables = variables.len(),
            bind_parameters = analyzer.bind_parameters.len(),
            "assembled request template",
        );

        Ok(RequestTemplate {
            bind_parameters: analyzer.bind_parameters,
            document,
            kind,
            name: assembled.operation.name,
            variables,
        })
    }
}

fn parse(source: &str) -> Result<ParsedDocument> {
    Parser::new(source)
        .and_then(|mut parser| parser.parse_document())
        .map_err(|err| vec![err])
}

/// Text insertions keyed by byte offset into the fragment. Insertions at the
/// same offset are applied in the order they were planned.
fn plan_edits(
    parsed: &ParsedDocument,
    shape: Option<&ResponseShape>,
    kind: OperationKind,
    errors: &mut Vec<RequestPreparationError>,
) -> Vec<(usize, String)> {
    let operation = &parsed.operation;
    let root_set = &operation.selection_set;
    let mut edits = vec![];

    if operation.kind.is_none() {
        let header =
            if root_set.braced {
                format!("{kind} ")
            } else {
                format!("{kind} {{ ")
            };
        edits.push((root_set.span.start, header));
    }

    if let Some(shape) = shape {
        for (response_key, field_shape) in shape.root().fields() {
            let mut matching = root_set.selections.iter()
                .filter_map(|selection| match selection {
                    ParsedSelection::Field(field) if field.response_key() == response_key =>
                        Some(field),
                    _ => None,
                })
                .peekable();

            if matching.peek().is_none() {
                errors.push(RequestPreparationError::ShapeFieldNotInFragment {
                    field_name: response_key.clone(),
                });
                continue;
            }

            let Some(object_shape) = field_shape.node().object_shape() else {
                continue;
            };
            for field in matching.filter(|field| field.selection_set.is_none()) {
                edits.push((field.head_end, format!(" {}", object_shape.selection_text())));
            }
        }
    }

    if operation.kind.is_none() && !root_set.braced {
        edits.push((root_set.span.end, " }".to_string()));
    }

    edits.sort_by_key(|(offset, _)| *offset);
    edits
}

fn apply_edits(source: &str, edits: Vec<(usize, String)>) -> String {
    let extra: usize = edits.iter().map(|(_, text)| text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut copied_to = 0;
    for (offset, text) in edits {
        out.push_str(&source[copied_to..offset]);
        out.push_str(&text);
        copied_to = offset;
    }
    out.push_str(&source[copied_to..]);
    out
}

/// Collects bind parameter occurrences (resolving each one's target input
/// type where the registry allows) and variable references.
struct DocumentAnalyzer<'reg> {
    bind_parameters: IndexMap<String, BindParameter>,
    registry: &'reg SchemaRegistry,
    variable_refs: IndexSet<String>,
}
impl<'reg> DocumentAnalyzer<'reg> {
    fn new(registry: &'reg SchemaRegistry) -> Self {
        Self {
            bind_parameters: IndexMap::new(),
            registry,
            variable_refs: IndexSet::new(),
        }
    }

    fn visit_document(
        &mut self,
        doc: &ParsedDocument,
        kind: OperationKind,
        errors: &mut Vec<RequestPreparationError>,
    ) {
        let registry = self.registry;
        let root_type = registry.root_type_name(kind);
        if registry.is_schema_aware() && root_type.is_none() {
            errors.push(RequestPreparationError::UnknownRootOperationType { kind });
        }

        for var_def in &doc.operation.variables {
            if let Some(default_value) = &var_def.default_value {
                self.visit_value(default_value, Some(&var_def.type_annotation));
            }
        }
        self.visit_directives(&doc.operation.directives);
        self.visit_selection_set(&doc.operation.selection_set, root_type);

        for fragment in &doc.fragments {
            self.visit_selection_set(
                &fragment.selection_set,
                Some(fragment.type_condition.as_str()),
            );
        }
    }

    fn visit_selection_set(
        &mut self,
        selection_set: &ParsedSelectionSet,
        parent_type: Option<&str>,
    ) {
        let registry = self.registry;
        for selection in &selection_set.selections {
            match selection {
                ParsedSelection::Field(field) => {
                    let field_def = parent_type
                        .and_then(|type_name| registry.field(type_name, &field.name));
                    for arg in &field.arguments {
                        let target = field_def
                            .and_then(|def| def.arguments().get(&arg.name))
                            .map(|arg_def| arg_def.type_annotation());
                        self.visit_value(&arg.value, target);
                    }
                    self.visit_directives(&field.directives);
                    if let Some(sub_selection) = &field.selection_set {
                        self.visit_selection_set(
                            sub_selection,
                            field_def.map(|def| def.type_annotation().innermost_name()),
                        );
                    }
                },

                ParsedSelection::FragmentSpread { directives } =>
                    self.visit_directives(directives),

                ParsedSelection::InlineFragment {
                    directives,
                    selection_set,
                    type_condition,
                } => {
                    self.visit_directives(directives);
                    self.visit_selection_set(
                        selection_set,
                        type_condition.as_deref().or(parent_type),
                    );
                },
            }
        }
    }

    fn visit_directives(&mut self, directives: &[ParsedDirective]) {
        let boolean = TypeAnnotation::named("Boolean").non_null();
        for directive in directives {
            let is_conditional = matches!(directive.name.as_str(), "include" | "skip");
            for arg in &directive.arguments {
                let target =
                    if is_conditional && arg.name == "if" {
                        Some(&boolean)
                    } else {
                        None
                    };
                self.visit_value(&arg.value, target);
            }
        }
    }

    fn visit_value(&mut self, value: &ParsedValue, target: Option<&TypeAnnotation>) {
        let registry = self.registry;
        match value {
            ParsedValue::BindParameter { name, span } => {
                self.bind_parameters.entry(name.clone())
                    .or_insert_with(|| BindParameter {
                        name: name.clone(),
                        occurrences: smallvec![],
                    })
                    .occurrences
                    .push(BindOccurrence {
                        span: span.clone(),
                        target_type: target.cloned(),
                    });
            },

            ParsedValue::Constant => (),

            ParsedValue::List(items) => {
                let item_target = target.and_then(TypeAnnotation::list_item);
                for item in items {
                    self.visit_value(item, item_target);
                }
            },

            ParsedValue::Object(fields) => {
                let input_type = target
                    .and_then(|annot| registry.get_type(annot.innermost_name()))
                    .and_then(SchemaType::as_input_object);
                for (field_name, field_value) in fields {
                    let field_target = input_type
                        .and_then(|input| input.fields().get(field_name))
                        .map(|field_def| field_def.type_annotation());
                    self.visit_value(field_value, field_target);
                }
            },

            ParsedValue::Variable { name } => {
                self.variable_refs.insert(name.clone());
            },
        }
    }
}

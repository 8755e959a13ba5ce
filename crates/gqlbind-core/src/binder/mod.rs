//! Binding of runtime values into a [`RequestTemplate`].
//!
//! GraphQL variables (`$name`) travel to the server as JSON next to the
//! document. Bind parameters (`&name`) never leave the client: each
//! occurrence is replaced by a literal encoded for its own target type before
//! the document is sent.

mod bound_request;

pub use bound_request::BoundRequest;

use crate::document::RequestPreparationError;
use crate::document::RequestTemplate;
use crate::literal;
use crate::schema::SchemaRegistry;
use crate::Value;
use indexmap::IndexMap;
use std::ops::Range;

#[cfg(test)]
mod tests;

type Result<T> = std::result::Result<T, Vec<RequestPreparationError>>;

impl RequestTemplate {
    /// Bind `values` into this template.
    ///
    /// Every bind parameter must be supplied. Declared variables may be left
    /// out when they are nullable or have a default. A supplied name that is
    /// neither a variable nor a bind parameter of this template is an error.
    /// A name declared both ways feeds both mechanisms from the same value.
    pub fn bind(
        &self,
        registry: &SchemaRegistry,
        values: &IndexMap<String, Value>,
    ) -> Result<BoundRequest> {
        let mut errors = vec![];

        let mut replacements: Vec<(Range<usize>, String)> = vec![];
        for (name, param) in self.bind_parameters() {
            let Some(value) = values.get(name) else {
                errors.push(RequestPreparationError::MissingBindParameter {
                    name: name.clone(),
                });
                continue;
            };
            for occurrence in param.occurrences() {
                match literal::encode_literal(value, occurrence.target_type(), registry) {
                    Ok(text) => replacements.push((occurrence.span(), text)),
                    Err(source) => {
                        errors.push(RequestPreparationError::BindParameterMismatch {
                            name: name.clone(),
                            source,
                        });
                        break;
                    },
                }
            }
        }

        let mut variables = serde_json::Map::new();
        for (name, var_def) in self.variables() {
            let Some(value) = values.get(name) else {
                if var_def.is_required() {
                    errors.push(RequestPreparationError::MissingVariable {
                        name: name.clone(),
                    });
                }
                continue;
            };
            match literal::encode_variable(value, var_def.type_annotation(), registry) {
                Ok(json) => {
                    variables.insert(name.clone(), json);
                },
                Err(source) => errors.push(RequestPreparationError::VariableTypeMismatch {
                    name: name.clone(),
                    source,
                }),
            }
        }

        for name in values.keys() {
            if !self.bind_parameters().contains_key(name) && !self.variables().contains_key(name) {
                errors.push(RequestPreparationError::UnexpectedParameter {
                    name: name.clone(),
                });
            }
        }

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "failed to bind request");
            return Err(errors);
        }

        replacements.sort_by_key(|(span, _)| span.start);
        let document = splice(self.document(), replacements);

        tracing::trace!(
            kind = %self.kind(),
            variables = variables.len(),
            "bound request",
        );

        Ok(BoundRequest {
            document,
            kind: self.kind(),
            operation_name: self.name().map(str::to_string),
            variables,
        })
    }
}

fn splice(source: &str, replacements: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut copied_to = 0;
    for (span, text) in replacements {
        out.push_str(&source[copied_to..span.start]);
        out.push_str(&text);
        copied_to = span.end;
    }
    out.push_str(&source[copied_to..]);
    out
}

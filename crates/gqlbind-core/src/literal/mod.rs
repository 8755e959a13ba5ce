//! Serialization of runtime [`Value`]s into GraphQL literal syntax.
//!
//! Bind parameters are spliced into the request document as literals, so the
//! output of this module has to be text that a GraphQL parser reads back as the
//! same value.

use crate::schema::InputObjectType;
use crate::schema::SchemaRegistry;
use crate::schema::SchemaType;
use crate::types::TypeAnnotation;
use crate::Value;
use indexmap::IndexMap;
use thiserror::Error;

type Result<T> = std::result::Result<T, EncodingError>;

#[cfg(test)]
mod tests;

/// Encode `value` as GraphQL literal text.
///
/// When `target` is known the value is checked against it: `null` for a
/// non-null type is rejected, enum values and input object fields are checked
/// against the registry, and scalar targets are encoded by the registered
/// [`ScalarCodec`](crate::schema::ScalarCodec). A non-list value given for a
/// list target encodes as a single item, following GraphQL input coercion.
pub fn encode_literal(
    value: &Value,
    target: Option<&TypeAnnotation>,
    registry: &SchemaRegistry,
) -> Result<String> {
    let mut out = String::new();
    let encoder = LiteralEncoder { registry };
    match target {
        Some(target) => encoder.encode_typed(value, target, &mut out)?,
        None => encode_untyped_into(value, &mut out)?,
    }
    Ok(out)
}

/// Encode `value` without any type information.
pub fn encode_untyped(value: &Value) -> Result<String> {
    let mut out = String::new();
    encode_untyped_into(value, &mut out)?;
    Ok(out)
}

/// Render a float as a GraphQL `FloatValue`. The output always carries a
/// fraction or an exponent so it never reads back as an `IntValue`.
pub fn format_float(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(EncodingError::NonFiniteFloat(value));
    }
    Ok(format!("{value:?}"))
}

/// Quote and escape a string as a GraphQL `StringValue`.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_quoted(value, &mut out);
    out
}

/// Encode a JSON document as a GraphQL value literal. Objects become input
/// object literals, so every key has to be a valid GraphQL name.
pub fn json_to_literal(json: &serde_json::Value) -> Result<String> {
    let mut out = String::new();
    push_json(json, &mut out)?;
    Ok(out)
}

fn check_input_fields(
    fields: &IndexMap<String, Value>,
    input_type: &InputObjectType,
) -> Result<()> {
    for field_name in fields.keys() {
        if !input_type.fields().contains_key(field_name) {
            return Err(EncodingError::UnknownInputField {
                field_name: field_name.clone(),
                type_name: input_type.name().to_string(),
            });
        }
    }
    for field_def in input_type.fields().values() {
        if field_def.is_required() && !fields.contains_key(field_def.name()) {
            return Err(EncodingError::MissingInputField {
                field_name: field_def.name().to_string(),
                type_name: input_type.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Convert `value` to the JSON sent for a GraphQL variable declared with
/// `target`, applying the same checks as [`encode_literal()`].
pub fn encode_variable(
    value: &Value,
    target: &TypeAnnotation,
    registry: &SchemaRegistry,
) -> Result<serde_json::Value> {
    if value.is_null() {
        if !target.nullable() {
            return Err(EncodingError::NullForNonNull(target.to_string()));
        }
        return Ok(serde_json::Value::Null);
    }

    let type_name = match target {
        TypeAnnotation::List { inner, .. } => return match value {
            Value::List(items) => items.iter()
                .map(|item| encode_variable(item, inner, registry))
                .collect::<Result<Vec<_>>>()
                .map(serde_json::Value::Array),
            _ => encode_variable(value, inner, registry),
        },
        TypeAnnotation::Named { name, .. } => name.as_str(),
    };

    if let Some(codec) = registry.codec(type_name) {
        return codec.to_json(value);
    }

    match registry.get_type(type_name) {
        Some(SchemaType::Enum(enum_type)) => match value {
            Value::Enum(name) | Value::String(name) if enum_type.has_value(name) =>
                Ok(serde_json::Value::String(name.clone())),
            Value::Enum(name) | Value::String(name) => Err(EncodingError::UnknownEnumValue {
                enum_name: type_name.to_string(),
                value: name.clone(),
            }),
            _ => Err(EncodingError::TypeMismatch {
                expected: type_name.to_string(),
                found: value.kind_name(),
            }),
        },

        Some(SchemaType::InputObject(input_type)) => {
            let Value::Object(fields) = value else {
                return Err(EncodingError::TypeMismatch {
                    expected: type_name.to_string(),
                    found: value.kind_name(),
                });
            };
            check_input_fields(fields, input_type)?;
            let mut map = serde_json::Map::with_capacity(fields.len());
            for (field_name, field_value) in fields {
                if let Some(field_def) = input_type.fields().get(field_name) {
                    map.insert(
                        field_name.clone(),
                        encode_variable(field_value, field_def.type_annotation(), registry)?,
                    );
                }
            }
            Ok(serde_json::Value::Object(map))
        },

        Some(SchemaType::Scalar(_)) => value.to_json(),

        Some(other) => Err(EncodingError::NotAnInputType {
            kind: other.kind_name(),
            type_name: type_name.to_string(),
        }),

        None if registry.is_schema_aware() =>
            Err(EncodingError::UnknownType(type_name.to_string())),

        None => value.to_json(),
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => (),
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn check_enum_name(name: &str) -> Result<()> {
    if !is_valid_name(name) || matches!(name, "true" | "false" | "null") {
        return Err(EncodingError::InvalidEnumName(name.to_string()));
    }
    Ok(())
}

fn check_field_name(name: &str) -> Result<()> {
    if !is_valid_name(name) {
        return Err(EncodingError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}

fn push_quoted(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() =>
                out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_json(json: &serde_json::Value, out: &mut String) -> Result<()> {
    match json {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => out.push_str(&i.to_string()),
            None if n.is_u64() => out.push_str(&n.to_string()),
            None => out.push_str(&format_float(n.as_f64().unwrap_or(f64::NAN))?),
        },
        serde_json::Value::String(s) => push_quoted(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                push_json(item, out)?;
            }
            out.push(']');
        },
        serde_json::Value::Object(entries) => {
            out.push('{');
            for (idx, (key, value)) in entries.iter().enumerate() {
                check_field_name(key)?;
                if idx > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                push_json(value, out)?;
            }
            out.push('}');
        },
    }
    Ok(())
}

fn encode_untyped_into(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)?),
        Value::String(s) => push_quoted(s, out),
        Value::Enum(name) => {
            check_enum_name(name)?;
            out.push_str(name);
        },
        Value::List(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                encode_untyped_into(item, out)?;
            }
            out.push(']');
        },
        Value::Object(fields) => {
            out.push('{');
            for (idx, (name, field_value)) in fields.iter().enumerate() {
                check_field_name(name)?;
                if idx > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                encode_untyped_into(field_value, out)?;
            }
            out.push('}');
        },
        Value::Json(json) => push_json(json, out)?,
        Value::DateTime(dt) => push_quoted(&dt.to_rfc3339(), out),
        Value::Date(date) => push_quoted(&date.format("%Y-%m-%d").to_string(), out),
    }
    Ok(())
}

struct LiteralEncoder<'reg> {
    registry: &'reg SchemaRegistry,
}
impl LiteralEncoder<'_> {
    fn encode_typed(
        &self,
        value: &Value,
        target: &TypeAnnotation,
        out: &mut String,
    ) -> Result<()> {
        if value.is_null() {
            if !target.nullable() {
                return Err(EncodingError::NullForNonNull(target.to_string()));
            }
            out.push_str("null");
            return Ok(());
        }

        match target {
            TypeAnnotation::List { inner, .. } => match value {
                Value::List(items) => {
                    out.push('[');
                    for (idx, item) in items.iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }
                        self.encode_typed(item, inner, out)?;
                    }
                    out.push(']');
                    Ok(())
                },
                _ => self.encode_typed(value, inner, out),
            },

            TypeAnnotation::Named { name, .. } =>
                self.encode_named(value, name, out),
        }
    }

    fn encode_named(
        &self,
        value: &Value,
        type_name: &str,
        out: &mut String,
    ) -> Result<()> {
        if let Some(codec) = self.registry.codec(type_name) {
            out.push_str(&codec.encode_literal(value)?);
            return Ok(());
        }

        match self.registry.get_type(type_name) {
            Some(SchemaType::Enum(enum_type)) => {
                let name = match value {
                    Value::Enum(name) | Value::String(name) => name,
                    _ => return Err(EncodingError::TypeMismatch {
                        expected: type_name.to_string(),
                        found: value.kind_name(),
                    }),
                };
                if !enum_type.has_value(name) {
                    return Err(EncodingError::UnknownEnumValue {
                        enum_name: type_name.to_string(),
                        value: name.clone(),
                    });
                }
                out.push_str(name);
                Ok(())
            },

            Some(SchemaType::InputObject(input_type)) => {
                let Value::Object(fields) = value else {
                    return Err(EncodingError::TypeMismatch {
                        expected: type_name.to_string(),
                        found: value.kind_name(),
                    });
                };

                check_input_fields(fields, input_type)?;

                out.push('{');
                for (idx, (field_name, field_value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(field_name);
                    out.push_str(": ");
                    // Presence was checked above.
                    if let Some(field_def) = input_type.fields().get(field_name) {
                        self.encode_typed(field_value, field_def.type_annotation(), out)?;
                    }
                }
                out.push('}');
                Ok(())
            },

            // Custom scalars without a registered codec pass through untyped.
            Some(SchemaType::Scalar(_)) => encode_untyped_into(value, out),

            Some(other) => Err(EncodingError::NotAnInputType {
                kind: other.kind_name(),
                type_name: type_name.to_string(),
            }),

            None if self.registry.is_schema_aware() =>
                Err(EncodingError::UnknownType(type_name.to_string())),

            None => encode_untyped_into(value, out),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EncodingError {
    #[error("integer `{0}` does not fit in a 32-bit GraphQL Int")]
    IntOutOfRange(i64),

    #[error("`{0}` is not a valid enum value name")]
    InvalidEnumName(String),

    #[error("`{0}` is not a valid input object field name")]
    InvalidFieldName(String),

    #[error("invalid value for scalar `{scalar}`: {reason}")]
    InvalidScalar {
        reason: String,
        scalar: String,
    },

    #[error("missing required field `{field_name}` of input type `{type_name}`")]
    MissingInputField {
        field_name: String,
        type_name: String,
    },

    #[error("`{0}` can not be represented as a GraphQL Float")]
    NonFiniteFloat(f64),

    #[error("`{type_name}` is an {kind} type and can not be used as an input")]
    NotAnInputType {
        kind: &'static str,
        type_name: String,
    },

    #[error("null given for non-null type `{0}`")]
    NullForNonNull(String),

    #[error("expected a value of type `{expected}` but found a {found} value")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("`{value}` is not a value of enum `{enum_name}`")]
    UnknownEnumValue {
        enum_name: String,
        value: String,
    },

    #[error("`{field_name}` is not a field of input type `{type_name}`")]
    UnknownInputField {
        field_name: String,
        type_name: String,
    },

    #[error("unknown type `{0}`")]
    UnknownType(String),
}

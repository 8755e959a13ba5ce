//! Decoding of response JSON into [`TypedObject`] graphs.

mod decoding_error;

pub use decoding_error::DecodingError;

use crate::response::DecodedResponse;
use crate::response::ResponseEnvelope;
use crate::response::ResponsePath;
use crate::response::ResponseValue;
use crate::response::TypedObject;
use crate::schema::SchemaRegistry;
use crate::schema::SchemaType;
use crate::shape::FieldShape;
use crate::shape::ObjectShape;
use crate::shape::ResponseShape;
use crate::shape::ShapeNode;
use crate::shape::DEFAULT_DISCRIMINATOR;
use crate::Value;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, DecodingError>;

/// Decodes response envelopes against a [`ResponseShape`], using the
/// registry's scalar codecs and enum definitions for leaves.
#[derive(Clone, Copy, Debug)]
pub struct ResponseDecoder<'reg> {
    registry: &'reg SchemaRegistry,
}
impl<'reg> ResponseDecoder<'reg> {
    pub fn new(registry: &'reg SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decode `envelope.data` as an object of `shape`'s root type. Errors and
    /// extensions are carried over untouched.
    ///
    /// A response without server errors must match `shape` exactly. When the
    /// server did report errors, fields that fail to decode become `null` and
    /// their [`DecodingError`]s are kept on the result next to the server's
    /// errors, so the rest of the partial data survives.
    pub fn decode(
        &self,
        envelope: ResponseEnvelope,
        shape: &ResponseShape,
    ) -> Result<DecodedResponse> {
        let mut path = ResponsePath::root();
        let mut recovered = vec![];
        let data = match &envelope.data {
            None | Some(serde_json::Value::Null) => None,
            Some(json) if envelope.has_errors() => {
                match self.decode_object_in(json, shape.root(), &mut path, Some(&mut recovered)) {
                    Ok(data) => Some(data),
                    Err(err) => {
                        recovered.push(err);
                        None
                    },
                }
            },
            Some(json) => Some(self.decode_object_in(json, shape.root(), &mut path, None)?),
        };

        tracing::debug!(
            root_type = shape.root().type_name(),
            has_data = data.is_some(),
            errors = envelope.errors.len(),
            decoding_errors = recovered.len(),
            "decoded response",
        );

        Ok(DecodedResponse {
            data,
            decoding_errors: recovered,
            errors: envelope.errors,
            extensions: envelope.extensions,
        })
    }

    /// Decode a single JSON object against `shape`, resolving polymorphic
    /// shapes through their discriminator.
    pub fn decode_object(
        &self,
        json: &serde_json::Value,
        shape: &ObjectShape,
        path: &mut ResponsePath,
    ) -> Result<TypedObject> {
        self.decode_object_in(json, shape, path, None)
    }

    /// With `recovered` set, a field that fails to decode is recorded there
    /// and decodes as `null` instead of failing the whole object.
    fn decode_object_in(
        &self,
        json: &serde_json::Value,
        shape: &ObjectShape,
        path: &mut ResponsePath,
        mut recovered: Option<&mut Vec<DecodingError>>,
    ) -> Result<TypedObject> {
        let serde_json::Value::Object(members) = json else {
            return Err(DecodingError::UnexpectedJsonShape {
                expected: "an object",
                found: json_kind(json),
                path: path.clone(),
            });
        };

        let (typename, variant) = resolve_variant(members, shape, path)?;

        let mut fields = IndexMap::with_capacity(shape.fields().len());
        let variant_fields = variant.into_iter().flat_map(|variant| variant.fields().values());
        for field in shape.fields().values().chain(variant_fields) {
            let key = field.response_key();
            let value = match self.decode_field(members.get(key), field, path, recovered.as_deref_mut()) {
                Ok(value) => value,
                Err(err) => match recovered.as_deref_mut() {
                    Some(recovered) => {
                        tracing::debug!(%err, "nulled a field that could not be decoded");
                        recovered.push(err);
                        ResponseValue::Null
                    },
                    None => return Err(err),
                },
            };
            fields.insert(key.to_string(), value);
        }

        Ok(TypedObject { fields, typename })
    }

    fn decode_field(
        &self,
        json: Option<&serde_json::Value>,
        field: &FieldShape,
        path: &mut ResponsePath,
        recovered: Option<&mut Vec<DecodingError>>,
    ) -> Result<ResponseValue> {
        let Some(json) = json else {
            return Ok(ResponseValue::Null);
        };
        path.push(field.response_key());
        let value = self.decode_node(json, field.node(), path, recovered);
        path.pop();
        value
    }

    fn decode_node(
        &self,
        json: &serde_json::Value,
        node: &ShapeNode,
        path: &mut ResponsePath,
        mut recovered: Option<&mut Vec<DecodingError>>,
    ) -> Result<ResponseValue> {
        if json.is_null() {
            return Ok(ResponseValue::Null);
        }

        match node {
            ShapeNode::Leaf { type_name } =>
                self.decode_leaf(json, type_name, path).map(ResponseValue::Leaf),

            ShapeNode::List(inner) => {
                let serde_json::Value::Array(items) = json else {
                    return Err(DecodingError::UnexpectedJsonShape {
                        expected: "a list",
                        found: json_kind(json),
                        path: path.clone(),
                    });
                };
                let mut decoded = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    path.push(idx);
                    let value = self.decode_node(item, inner, path, recovered.as_deref_mut());
                    path.pop();
                    decoded.push(value?);
                }
                Ok(ResponseValue::List(decoded))
            },

            ShapeNode::Object(shape) =>
                self.decode_object_in(json, shape, path, recovered).map(ResponseValue::Object),
        }
    }

    fn decode_leaf(
        &self,
        json: &serde_json::Value,
        type_name: &str,
        path: &ResponsePath,
    ) -> Result<Value> {
        if let Some(codec) = self.registry.codec(type_name) {
            return codec.decode(json).map_err(|source| DecodingError::InvalidScalar {
                path: path.clone(),
                scalar: type_name.to_string(),
                source,
            });
        }

        match self.registry.get_type(type_name) {
            Some(SchemaType::Enum(enum_type)) => {
                let serde_json::Value::String(name) = json else {
                    return Err(DecodingError::UnexpectedJsonShape {
                        expected: "an enum value string",
                        found: json_kind(json),
                        path: path.clone(),
                    });
                };
                if !enum_type.has_value(name) {
                    return Err(DecodingError::UnknownEnumValue {
                        enum_name: type_name.to_string(),
                        path: path.clone(),
                        value: name.clone(),
                    });
                }
                Ok(Value::Enum(name.clone()))
            },

            // Custom scalars without a codec, and leaves typed by names the
            // registry does not know, pass through untouched.
            _ => Ok(Value::Json(json.clone())),
        }
    }
}

/// The concrete type name of `members`, and the variant shape to merge in
/// when `shape` is polymorphic.
fn resolve_variant<'s>(
    members: &serde_json::Map<String, serde_json::Value>,
    shape: &'s ObjectShape,
    path: &ResponsePath,
) -> Result<(String, Option<&'s ObjectShape>)> {
    let Some(discriminator) = shape.discriminator() else {
        let typename = members.get(DEFAULT_DISCRIMINATOR)
            .and_then(serde_json::Value::as_str)
            .unwrap_or(shape.type_name());
        return Ok((typename.to_string(), None));
    };

    let Some(typename) = members.get(discriminator).and_then(serde_json::Value::as_str) else {
        return Err(DecodingError::MissingDiscriminator {
            discriminator: discriminator.to_string(),
            path: path.clone(),
        });
    };

    if let Some(variant) = shape.variant(typename) {
        tracing::trace!(%path, typename, "resolved polymorphic variant");
        return Ok((typename.to_string(), Some(variant)));
    }
    if typename == shape.type_name() {
        return Ok((typename.to_string(), None));
    }
    Err(DecodingError::UnknownDiscriminator {
        path: path.clone(),
        type_name: shape.type_name().to_string(),
        typename: typename.to_string(),
    })
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Null => "null",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::Object(_) => "an object",
        serde_json::Value::String(_) => "a string",
    }
}

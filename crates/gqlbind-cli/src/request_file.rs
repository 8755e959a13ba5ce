use anyhow::Context;
use gqlbind::OperationKind;
use gqlbind::Value;
use gqlbind::document::BindParameter;
use gqlbind::document::RequestTemplate;
use gqlbind::schema::SchemaRegistry;
use gqlbind::schema::SchemaType;
use indexmap::IndexMap;
use std::path::Path;
use std::path::PathBuf;

/// The operation kind a request file declares in its header. Files that
/// start with a bare selection set or bare root fields are queries.
pub(crate) fn infer_kind(source: &str) -> OperationKind {
    let keyword = source.lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.split(|c: char| !c.is_ascii_alphabetic())
                .next()
                .unwrap_or_default()
        })
        .unwrap_or_default();
    OperationKind::from_keyword(keyword).unwrap_or(OperationKind::Query)
}

/// Build a registry from SDL files, or the schema-less built-in registry when
/// none are given.
pub(crate) fn load_registry(schema_files: &[PathBuf]) -> anyhow::Result<SchemaRegistry> {
    if schema_files.is_empty() {
        log::debug!("No schema files given; using the built-in scalar registry.");
        return Ok(SchemaRegistry::builtin());
    }
    log::debug!("Loading {} schema files...", schema_files.len());
    let registry = SchemaRegistry::builder()
        .load_files(schema_files.to_vec())
        .and_then(|builder| builder.build())
        .context("failed to build the schema registry")?;
    Ok(registry)
}

pub(crate) fn read_request(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {path:?}"))
}

/// Parse a `name=<json>` argument.
pub(crate) fn parse_assignment(arg: &str) -> anyhow::Result<(String, Value)> {
    let (name, json) = arg.split_once('=')
        .with_context(|| format!("`{arg}` is not of the form `name=<json>`"))?;
    let json: serde_json::Value = serde_json::from_str(json)
        .with_context(|| format!("the value of `{name}` is not valid JSON (strings must be quoted)"))?;
    Ok((name.trim().to_string(), Value::from_json(&json)))
}

/// Parse a `--bind` argument. Besides JSON, a bare GraphQL name such as
/// `episode=JEDI` is read as an enum value.
pub(crate) fn parse_bind_assignment(arg: &str) -> anyhow::Result<(String, Value)> {
    if let Some((name, text)) = arg.split_once('=')
        && serde_json::from_str::<serde_json::Value>(text).is_err()
        && is_enum_name(text.trim()) {
        return Ok((name.trim().to_string(), Value::Enum(text.trim().to_string())));
    }
    parse_assignment(arg)
}

fn is_enum_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !matches!(text, "true" | "false" | "null")
}

/// Collect `--var` and `--bind` arguments into the values `template` is bound
/// with. A name must be given under the flag matching how the document
/// declares it; a name declared both as `$name` and `&name` takes either.
pub(crate) fn collect_values(
    template: &RequestTemplate,
    registry: &SchemaRegistry,
    vars: &[String],
    binds: &[String],
) -> anyhow::Result<IndexMap<String, Value>> {
    let mut values = IndexMap::new();
    for arg in vars {
        let (name, value) = parse_assignment(arg)?;
        if !template.variables().contains_key(&name)
            && template.bind_parameters().contains_key(&name) {
            anyhow::bail!("`{name}` is a bind parameter (`&{name}`); pass it with `--bind`");
        }
        insert_once(&mut values, name, value)?;
    }
    for arg in binds {
        let (name, value) = parse_bind_assignment(arg)?;
        let value = match template.bind_parameters().get(&name) {
            Some(param) if targets_enum(param, registry) => strings_to_enums(value),
            Some(_) => value,
            None if template.variables().contains_key(&name) => anyhow::bail!(
                "`{name}` is a GraphQL variable (`${name}`); pass it with `--var`"
            ),
            None => value,
        };
        insert_once(&mut values, name, value)?;
    }
    Ok(values)
}

fn insert_once(
    values: &mut IndexMap<String, Value>,
    name: String,
    value: Value,
) -> anyhow::Result<()> {
    if values.contains_key(&name) {
        anyhow::bail!("`{name}` is given more than once");
    }
    values.insert(name, value);
    Ok(())
}

fn targets_enum(param: &BindParameter, registry: &SchemaRegistry) -> bool {
    let mut targets = param.occurrences()
        .iter()
        .filter_map(|occurrence| occurrence.target_type())
        .peekable();
    targets.peek().is_some() && targets.all(|target| matches!(
        registry.get_type(target.innermost_name()),
        Some(SchemaType::Enum(_)),
    ))
}

fn strings_to_enums(value: Value) -> Value {
    match value {
        Value::String(name) => Value::Enum(name),
        Value::List(items) => Value::List(items.into_iter().map(strings_to_enums).collect()),
        other => other,
    }
}

/// Parse a `name:value` header argument.
pub(crate) fn parse_header(arg: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = arg.split_once(':')
        .with_context(|| format!("`{arg}` is not of the form `name:value`"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

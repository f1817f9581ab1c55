use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{FieldDescriptor, FieldType, IntRange, IntSpec, StrSpec, ValueSet};

static INT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rand\(([+-]?\d+),([+-]?\d+)\)$").expect("valid range pattern")
});

/// Non-fatal issue found while parsing a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

/// Parsed schema: field name to descriptor, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchema {
    fields: Vec<(String, FieldDescriptor)>,
    warnings: Vec<SchemaWarning>,
}

impl ParsedSchema {
    /// Parse an in-memory mapping of field name to spec string.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut fields: Vec<(String, FieldDescriptor)> = Vec::new();
        let mut warnings = Vec::new();

        for (name, spec) in pairs {
            let name = name.into();
            if name.is_empty() {
                return Err(Error::EmptyFieldName);
            }
            let (descriptor, warning) = parse_spec(&name, spec.as_ref())?;
            warnings.extend(warning);
            match fields.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = descriptor,
                None => fields.push((name, descriptor)),
            }
        }

        if fields.is_empty() {
            return Err(Error::EmptySchema);
        }

        Ok(Self { fields, warnings })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Warnings raised while parsing; the schema is usable regardless.
    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }
}

/// Parse a schema document that must be a non-empty JSON object of strings.
pub fn parse_schema(schema: &Value) -> Result<ParsedSchema> {
    let object = as_object(schema)?;
    let mut pairs = Vec::with_capacity(object.len());
    for (name, definition) in object {
        let definition = definition.as_str().ok_or_else(|| Error::FieldNotString {
            field: name.clone(),
            found: json_kind(definition),
        })?;
        pairs.push((name.clone(), definition));
    }
    ParsedSchema::from_pairs(pairs)
}

/// Parse schema JSON text.
pub fn parse_schema_str(json: &str) -> Result<ParsedSchema> {
    let value: Value = serde_json::from_str(json)?;
    parse_schema(&value)
}

/// Parse one field definition taken from a JSON document.
///
/// Warnings are dropped; use [`parse_spec`] to keep them.
pub fn parse_field(field: &str, definition: &Value) -> Result<FieldDescriptor> {
    let definition = definition.as_str().ok_or_else(|| Error::FieldNotString {
        field: field.to_string(),
        found: json_kind(definition),
    })?;
    parse_spec(field, definition).map(|(descriptor, _)| descriptor)
}

/// Parse a raw `type:value` spec string.
pub fn parse_spec(field: &str, spec: &str) -> Result<(FieldDescriptor, Option<SchemaWarning>)> {
    let (type_token, value) = spec.split_once(':').ok_or_else(|| Error::MissingColon {
        field: field.to_string(),
        definition: spec.to_string(),
    })?;

    let type_token = type_token.trim();
    let field_type = FieldType::from_token(type_token).ok_or_else(|| Error::UnknownType {
        field: field.to_string(),
        type_name: type_token.to_string(),
    })?;

    match field_type {
        FieldType::Timestamp => Ok(parse_timestamp(field, value)),
        FieldType::String => parse_str(field, value).map(|descriptor| (descriptor, None)),
        FieldType::Integer => parse_int(field, value).map(|descriptor| (descriptor, None)),
    }
}

fn parse_timestamp(field: &str, value: &str) -> (FieldDescriptor, Option<SchemaWarning>) {
    let trailing = value.trim();
    let warning = if trailing.is_empty() {
        None
    } else {
        Some(SchemaWarning {
            field: field.to_string(),
            code: "timestamp_value_ignored",
            message: format!("timestamp type only supports an empty value, ignoring '{trailing}'"),
        })
    };
    (FieldDescriptor::Timestamp, warning)
}

fn parse_str(field: &str, value: &str) -> Result<FieldDescriptor> {
    let value = value.trim();
    let spec = if value.is_empty() {
        StrSpec::Empty
    } else if value == "rand" {
        StrSpec::Random
    } else if let Some(items) = bracketed(value) {
        let values = split_set(items).map(str::to_string).collect();
        StrSpec::FromSet(non_empty_set(field, values)?)
    } else {
        StrSpec::Static(value.to_string())
    };
    Ok(FieldDescriptor::Str(spec))
}

fn parse_int(field: &str, value: &str) -> Result<FieldDescriptor> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingIntValue {
            field: field.to_string(),
        });
    }

    if let Some(captures) = INT_RANGE.captures(value) {
        let min = parse_i64(field, &captures[1])?;
        let max = parse_i64(field, &captures[2])?;
        let range = IntRange::new(min, max).ok_or_else(|| Error::InvalidRange {
            field: field.to_string(),
            min,
            max,
        })?;
        return Ok(FieldDescriptor::Int(IntSpec::Range(range)));
    }

    if value == "rand" {
        return Ok(FieldDescriptor::Int(IntSpec::Random));
    }

    if let Some(items) = bracketed(value) {
        let values = split_set(items)
            .map(|token| {
                token.parse::<i64>().map_err(|_| Error::NonIntegerInSet {
                    field: field.to_string(),
                    value: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(FieldDescriptor::Int(IntSpec::FromSet(non_empty_set(
            field, values,
        )?)));
    }

    parse_i64(field, value).map(|number| FieldDescriptor::Int(IntSpec::Static(number)))
}

fn bracketed(value: &str) -> Option<&str> {
    value.strip_prefix('[')?.strip_suffix(']')
}

fn split_set(items: &str) -> impl Iterator<Item = &str> {
    items.split(',').map(str::trim).filter(|token| !token.is_empty())
}

fn non_empty_set<T>(field: &str, values: Vec<T>) -> Result<ValueSet<T>> {
    ValueSet::new(values).ok_or_else(|| Error::EmptySet {
        field: field.to_string(),
    })
}

fn parse_i64(field: &str, value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| Error::InvalidInteger {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn as_object(schema: &Value) -> Result<&Map<String, Value>> {
    let object = schema.as_object().ok_or(Error::NotAnObject {
        found: json_kind(schema),
    })?;
    if object.is_empty() {
        return Err(Error::EmptySchema);
    }
    Ok(object)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

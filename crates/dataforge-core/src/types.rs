use std::fmt;

use serde::Serialize;

/// Value type declared by the `type` part of a spec string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Timestamp,
    String,
    Integer,
}

impl FieldType {
    /// Token used for this type in spec strings.
    pub fn token(self) -> &'static str {
        match self {
            FieldType::Timestamp => "timestamp",
            FieldType::String => "str",
            FieldType::Integer => "int",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "timestamp" => Some(FieldType::Timestamp),
            "str" => Some(FieldType::String),
            "int" => Some(FieldType::Integer),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Value-generation policy of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Random,
    FromSet,
    Range,
    Static,
    Empty,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strategy::Random => "random",
            Strategy::FromSet => "from_set",
            Strategy::Range => "range",
            Strategy::Static => "static",
            Strategy::Empty => "empty",
        };
        f.write_str(label)
    }
}

/// Non-empty, ordered list of candidate values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueSet<T>(Vec<T>);

impl<T> ValueSet<T> {
    /// Returns `None` when `values` is empty.
    pub fn new(values: Vec<T>) -> Option<Self> {
        if values.is_empty() {
            None
        } else {
            Some(Self(values))
        }
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.0.contains(value)
    }
}

/// Closed integer interval with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntRange {
    min: i64,
    max: i64,
}

impl IntRange {
    /// Returns `None` unless `min < max`.
    pub fn new(min: i64, max: i64) -> Option<Self> {
        if min < max { Some(Self { min, max }) } else { None }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Generation rule for a `str` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "value", rename_all = "snake_case")]
pub enum StrSpec {
    Random,
    FromSet(ValueSet<String>),
    Static(String),
    Empty,
}

/// Generation rule for an `int` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "value", rename_all = "snake_case")]
pub enum IntSpec {
    Random,
    Range(IntRange),
    FromSet(ValueSet<i64>),
    Static(i64),
}

/// Parsed, immutable generation rule for one schema field.
///
/// Only valid (type, strategy) pairs can be expressed, so consumers match
/// exhaustively without a fallback arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "spec", rename_all = "snake_case")]
pub enum FieldDescriptor {
    Timestamp,
    Str(StrSpec),
    Int(IntSpec),
}

impl FieldDescriptor {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldDescriptor::Timestamp => FieldType::Timestamp,
            FieldDescriptor::Str(_) => FieldType::String,
            FieldDescriptor::Int(_) => FieldType::Integer,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            FieldDescriptor::Timestamp => Strategy::Random,
            FieldDescriptor::Str(spec) => match spec {
                StrSpec::Random => Strategy::Random,
                StrSpec::FromSet(_) => Strategy::FromSet,
                StrSpec::Static(_) => Strategy::Static,
                StrSpec::Empty => Strategy::Empty,
            },
            FieldDescriptor::Int(spec) => match spec {
                IntSpec::Random => Strategy::Random,
                IntSpec::Range(_) => Strategy::Range,
                IntSpec::FromSet(_) => Strategy::FromSet,
                IntSpec::Static(_) => Strategy::Static,
            },
        }
    }
}

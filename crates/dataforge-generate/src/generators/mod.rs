pub mod primitives;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};

use dataforge_core::{FieldDescriptor, IntSpec, ParsedSchema, StrSpec};

/// Generated value for a field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl GeneratedValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            GeneratedValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// One generated line: field name to value, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, GeneratedValue)>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&GeneratedValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Produce one value for a descriptor.
///
/// Cannot fail: every descriptor shape the parser can build has a rule here.
pub fn generate_value(descriptor: &FieldDescriptor, rng: &mut dyn RngCore) -> GeneratedValue {
    match descriptor {
        FieldDescriptor::Timestamp => GeneratedValue::Float(primitives::timestamp_now()),
        FieldDescriptor::Str(spec) => match spec {
            StrSpec::Random => GeneratedValue::Text(primitives::random_short_id(rng)),
            StrSpec::FromSet(set) => GeneratedValue::Text(primitives::pick(rng, set).clone()),
            StrSpec::Static(value) => GeneratedValue::Text(value.clone()),
            StrSpec::Empty => GeneratedValue::Text(String::new()),
        },
        FieldDescriptor::Int(spec) => match spec {
            IntSpec::Random => GeneratedValue::Int(primitives::int_rand(rng)),
            IntSpec::Range(range) => {
                GeneratedValue::Int(primitives::int_range(rng, range.min(), range.max()))
            }
            IntSpec::FromSet(set) => GeneratedValue::Int(*primitives::pick(rng, set)),
            IntSpec::Static(value) => GeneratedValue::Int(*value),
        },
    }
}

/// Builds records from a parsed schema with a private random source.
#[derive(Debug)]
pub struct RecordGenerator<'a, R> {
    schema: &'a ParsedSchema,
    rng: R,
}

impl<'a, R: RngCore> RecordGenerator<'a, R> {
    pub fn new(schema: &'a ParsedSchema, rng: R) -> Self {
        Self { schema, rng }
    }

    pub fn schema(&self) -> &ParsedSchema {
        self.schema
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn generate_record(&mut self) -> Record {
        let schema = self.schema;
        let fields = schema
            .iter()
            .map(|(name, descriptor)| (name.to_string(), generate_value(descriptor, &mut self.rng)))
            .collect();
        Record { fields }
    }

    pub fn generate_records(&mut self, count: u64) -> Vec<Record> {
        self.records(count).collect()
    }

    /// Lazily generate `count` records.
    pub fn records(&mut self, count: u64) -> impl Iterator<Item = Record> + '_ {
        (0..count).map(move |_| self.generate_record())
    }
}

/// Derive a stable RNG for `key` from a run seed.
pub fn seeded_rng(seed: u64, key: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed, key))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

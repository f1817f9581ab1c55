use chrono::Utc;
use rand::{Rng, RngCore};
use uuid::Uuid;

use dataforge_core::{INT_RAND_MAX, INT_RAND_MIN, ValueSet};

const RANDOM_ID_LEN: usize = 8;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn timestamp_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// First eight hex digits of a random v4 UUID.
///
/// Only 32 bits of entropy: fine for test data, not a unique identifier.
pub fn random_short_id(rng: &mut dyn RngCore) -> String {
    let mut id = random_uuid(rng).simple().to_string();
    id.truncate(RANDOM_ID_LEN);
    id
}

pub fn random_uuid(rng: &mut dyn RngCore) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Lowercase hex string of exactly `len` digits.
pub fn random_hex(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

pub fn int_rand(rng: &mut dyn RngCore) -> i64 {
    rng.random_range(INT_RAND_MIN..=INT_RAND_MAX)
}

pub fn int_range(rng: &mut dyn RngCore, min: i64, max: i64) -> i64 {
    rng.random_range(min..=max)
}

pub fn pick<'a, T>(rng: &mut dyn RngCore, set: &'a ValueSet<T>) -> &'a T {
    let values = set.values();
    &values[rng.random_range(0..values.len())]
}

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::generators::primitives::{random_hex, random_uuid};

const RANDOM_PREFIX_LEN: usize = 6;

/// How output file names are prefixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePrefix {
    /// 1-based global file index.
    #[default]
    Count,
    /// Six lowercase hex digits.
    Random,
    /// Canonical dashed v4 UUID.
    Uuid,
}

impl FilePrefix {
    pub const VARIANTS: [&'static str; 3] = ["count", "random", "uuid"];

    pub fn as_str(self) -> &'static str {
        match self {
            FilePrefix::Count => "count",
            FilePrefix::Random => "random",
            FilePrefix::Uuid => "uuid",
        }
    }

    /// File name for the file at global `index`: `<prefix>_<base_name>.json`.
    pub fn file_name(self, base_name: &str, index: u64, rng: &mut dyn RngCore) -> String {
        let prefix = match self {
            FilePrefix::Count => index.to_string(),
            FilePrefix::Random => random_hex(rng, RANDOM_PREFIX_LEN),
            FilePrefix::Uuid => random_uuid(rng).hyphenated().to_string(),
        };
        format!("{prefix}_{base_name}.json")
    }
}

impl fmt::Display for FilePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilePrefix {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "count" => Ok(FilePrefix::Count),
            "random" => Ok(FilePrefix::Random),
            "uuid" => Ok(FilePrefix::Uuid),
            other => Err(format!(
                "file prefix must be one of {}, got '{other}'",
                Self::VARIANTS.join(", ")
            )),
        }
    }
}

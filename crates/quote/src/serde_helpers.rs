//! The suggested-fees API mixes string and number encodings for integers.

use serde::{Deserialize, Deserializer};

/// An integer the API sends either as a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum StringOrNumber {
    Number(u64),
    String(String),
}

impl StringOrNumber {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::String(s) => s,
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

//! Enumerated model identifiers
//!
//! Each variant names one deployed chat model. The constant-style name
//! (`GPT_4O`) is what configuration properties and request files use; the
//! deployment id (`gpt-4o`) is what the credential store is keyed by.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A specific deployed LLM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gpt4o,
    Gpt4oMini,
    Gpt4,
    Gpt4_32k,
    Gpt4Turbo,
    Gpt35Turbo,
    Gpt35Turbo16k,
}

/// Returned when a name does not match any known model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown model identifier: '{0}'")]
pub struct ModelIdParseError(pub String);

impl ModelId {
    /// All known models, in declaration order
    pub const ALL: [ModelId; 7] = [
        ModelId::Gpt4o,
        ModelId::Gpt4oMini,
        ModelId::Gpt4,
        ModelId::Gpt4_32k,
        ModelId::Gpt4Turbo,
        ModelId::Gpt35Turbo,
        ModelId::Gpt35Turbo16k,
    ];

    /// Constant-style name, as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gpt4o => "GPT_4O",
            Self::Gpt4oMini => "GPT_4O_MINI",
            Self::Gpt4 => "GPT_4",
            Self::Gpt4_32k => "GPT_4_32K",
            Self::Gpt4Turbo => "GPT_4_TURBO",
            Self::Gpt35Turbo => "GPT_35_TURBO",
            Self::Gpt35Turbo16k => "GPT_35_TURBO_16K",
        }
    }

    /// Deployment id used to look up credentials
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4 => "gpt-4",
            Self::Gpt4_32k => "gpt-4-32k",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt35Turbo => "gpt-35-turbo",
            Self::Gpt35Turbo16k => "gpt-35-turbo-16k",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelId {
    type Err = ModelIdParseError;

    /// Exact, case-sensitive match on the constant-style name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ModelIdParseError(s.to_string()))
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::errors::ConfigError;
use crate::{normalize_name, RecordType};

/// Types the static record table knows how to turn into answers.
pub const STATIC_RECORD_TYPES: &[RecordType] = &[
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::NS,
    RecordType::PTR,
    RecordType::TXT,
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordsConfig {
    /// TTL stamped on every synthesized answer.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Owner name to (type name to value).
    #[serde(default)]
    pub entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl RecordsConfig {
    /// Flattens the table into (normalized name, type, value) triples,
    /// rejecting types and values that cannot be answered.
    pub fn parsed_entries(&self) -> Result<Vec<(String, RecordType, String)>, ConfigError> {
        let mut parsed = Vec::new();

        for (name, by_type) in &self.entries {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Static record with empty owner name".to_string(),
                ));
            }
            let owner = normalize_name(name);

            for (type_name, value) in by_type {
                let record_type = RecordType::from_str(type_name).map_err(|_| {
                    ConfigError::Validation(format!(
                        "Unknown record type '{}' for {}",
                        type_name, owner
                    ))
                })?;
                validate_value(&owner, record_type, value)?;
                parsed.push((owner.clone(), record_type, value.trim().to_string()));
            }
        }

        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_ttl == 0 {
            return Err(ConfigError::Validation(
                "records.default_ttl must be greater than 0".to_string(),
            ));
        }
        self.parsed_entries().map(|_| ())
    }
}

fn validate_value(owner: &str, record_type: RecordType, value: &str) -> Result<(), ConfigError> {
    if !STATIC_RECORD_TYPES.contains(&record_type) {
        return Err(ConfigError::Validation(format!(
            "Record type {} is not supported for static records ({})",
            record_type, owner
        )));
    }

    let value = value.trim();
    let valid = match record_type {
        RecordType::A => value.parse::<Ipv4Addr>().is_ok(),
        RecordType::AAAA => value.parse::<Ipv6Addr>().is_ok(),
        RecordType::CNAME | RecordType::NS | RecordType::PTR => {
            !value.is_empty() && !value.contains(char::is_whitespace)
        }
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "Invalid {} value '{}' for {}",
            record_type, value, owner
        )))
    }
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            entries: BTreeMap::new(),
        }
    }
}

fn default_ttl() -> u32 {
    7200
}

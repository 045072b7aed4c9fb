//! Courier definition loader
//!
//! Handles loading and parsing of courier definitions from YAML or JSON.
//! A definition describes one carrier and the tracking number formats it
//! issues:
//!
//! ```yaml
//! name: UPS
//! courier_code: ups
//! tracking_numbers:
//!   - name: UPS
//!     regex: '^ 1Z (?<SerialNumber> [A-Z0-9]{15} ) (?<CheckDigit> [A-Z0-9] ) $'
//!     validation:
//!       checksum:
//!         name: mod10
//!         evens_multiplier: 1
//!         odds_multiplier: 2
//!     tracking_url: 'https://wwwapps.ups.com/WebTracking/track?trackNums=%s'
//! ```
//!
//! Definitions are validated when parsed: patterns are compiled, checksum
//! parameters checked, and lookups cross-checked against the groups their
//! pattern declares. Size limits from [`crate::config`] apply.

use crate::checksum::Checksum;
use crate::config;
use crate::error::{EngineError, Result};
use crate::pattern::Pattern;
use crate::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Capture group holding the sequence the checksum runs over.
pub const SERIAL_NUMBER_GROUP: &str = "SerialNumber";

/// Capture group holding the check digit.
pub const CHECK_DIGIT_GROUP: &str = "CheckDigit";

/// Rebranding block carried by a `Courier` lookup entry.
///
/// Only the fields present override the base courier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourierOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

/// One row of an additional-attribute lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    /// Exact value of the captured group
    #[serde(default)]
    pub matches: Option<String>,
    /// Pattern run against the captured group; must produce a non-empty match
    #[serde(default)]
    pub matches_regex: Option<Pattern>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Rebranding block (regional partners reusing a parent's numbering)
    #[serde(default)]
    pub courier: Option<CourierOverride>,
    /// Remaining attributes, kept untyped
    #[serde(flatten)]
    pub fields: HashMap<String, AttributeValue>,
}

impl LookupEntry {
    /// Whether this entry selects the given captured value.
    pub fn matches_value(&self, value: &str) -> bool {
        if self.matches.as_deref() == Some(value) {
            return true;
        }
        self.matches_regex
            .as_ref()
            .is_some_and(|pattern| pattern.matches_non_empty(value))
    }

    /// Get an untyped attribute by name.
    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        self.fields.get(name)
    }
}

/// Lookup table resolving one additional attribute from a captured group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalLookup {
    /// Attribute name (e.g. "Service Type", "Courier")
    pub name: String,
    /// Capture group the lookup reads
    #[serde(rename = "regex_group_name")]
    pub group: String,
    #[serde(rename = "lookup", default)]
    pub entries: Vec<LookupEntry>,
}

/// Conditional prefix applied to the serial number before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrependIf {
    pub matches_regex: Pattern,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialNumberFormat {
    pub prepend_if: PrependIf,
}

/// Attributes that must resolve for a match to count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequiredAdditional {
    #[serde(default)]
    pub exists: Vec<String>,
}

/// Validation section of a format descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub checksum: Checksum,
    #[serde(default)]
    pub serial_number_format: Option<SerialNumberFormat>,
    #[serde(rename = "additional", default)]
    pub required: Option<RequiredAdditional>,
}

/// One tracking number layout issued by a courier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "regex")]
    pub pattern: Pattern,
    pub validation: Validation,
    #[serde(rename = "additional", default)]
    pub lookups: Vec<AdditionalLookup>,
    /// URL template; `%s` is replaced by the tracking number
    #[serde(default)]
    pub tracking_url: Option<String>,
}

impl FormatDescriptor {
    pub fn checksum(&self) -> &Checksum {
        &self.validation.checksum
    }

    /// The serial number rewrite rule, if any.
    pub fn serial_number_rewrite(&self) -> Option<&PrependIf> {
        self.validation
            .serial_number_format
            .as_ref()
            .map(|f| &f.prepend_if)
    }

    /// Names of the additional attributes that must resolve.
    pub fn required_attributes(&self) -> &[String] {
        self.validation
            .required
            .as_ref()
            .map(|r| r.exists.as_slice())
            .unwrap_or_default()
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.pattern.as_str())
    }

    fn validate(&self, courier_code: &str) -> Result<()> {
        let groups: Vec<&str> = self.pattern.group_names().collect();

        for required_group in [SERIAL_NUMBER_GROUP, CHECK_DIGIT_GROUP] {
            if !groups.contains(&required_group) {
                return Err(EngineError::Configuration(format!(
                    "Format '{}' of courier '{}' has no {} group",
                    self.label(),
                    courier_code,
                    required_group
                )));
            }
        }

        self.validation.checksum.check_parameters()?;

        if self.lookups.len() > config::MAX_LOOKUP_ENTRIES {
            return Err(EngineError::LoadError(format!(
                "Too many lookups ({}, max {})",
                self.lookups.len(),
                config::MAX_LOOKUP_ENTRIES
            )));
        }

        for lookup in &self.lookups {
            if lookup.entries.len() > config::MAX_LOOKUP_ENTRIES {
                return Err(EngineError::LoadError(format!(
                    "Too many entries in lookup '{}' ({}, max {})",
                    lookup.name,
                    lookup.entries.len(),
                    config::MAX_LOOKUP_ENTRIES
                )));
            }
            if !groups.contains(&lookup.group.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "Lookup '{}' in format '{}' reads unknown group '{}'",
                    lookup.name,
                    self.label(),
                    lookup.group
                )));
            }
        }

        for attribute in self.required_attributes() {
            if !self.lookups.iter().any(|l| &l.name == attribute) {
                return Err(EngineError::Configuration(format!(
                    "Format '{}' requires attribute '{}' but defines no lookup for it",
                    self.label(),
                    attribute
                )));
            }
        }

        Ok(())
    }
}

/// Represents one courier and its tracking number formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierDefinition {
    pub name: String,
    #[serde(rename = "courier_code")]
    pub code: String,
    #[serde(rename = "tracking_numbers", default)]
    pub formats: Vec<FormatDescriptor>,
}

impl CourierDefinition {
    /// Load a courier definition from a YAML or JSON file.
    ///
    /// The format is chosen by extension: `.json` is parsed as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LoadError` if the file cannot be read or exceeds
    /// [`config::MAX_DEFINITION_SIZE`], and a parse or configuration error if
    /// the content is not a valid definition.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        tracing::debug!(path = %path_ref.display(), "Loading courier definition");

        let metadata = fs::metadata(path_ref).map_err(|_| {
            EngineError::LoadError("Failed to access courier definition file".to_string())
        })?;

        let file_size = metadata.len() as usize;
        if file_size > config::MAX_DEFINITION_SIZE {
            tracing::warn!(
                size = file_size,
                max = config::MAX_DEFINITION_SIZE,
                "Courier definition file exceeds size limit"
            );
            return Err(EngineError::LoadError(format!(
                "File exceeds maximum size limit ({} bytes)",
                config::MAX_DEFINITION_SIZE
            )));
        }

        let content = fs::read_to_string(path_ref).map_err(|_| {
            EngineError::LoadError("Failed to read courier definition file".to_string())
        })?;

        if path_ref.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse a courier definition from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        check_content_size(content)?;
        let definition: Self = serde_yaml::from_str(content)?;
        definition.validate()?;
        tracing::debug!(
            courier = %definition.code,
            formats = definition.formats.len(),
            "Parsed courier definition"
        );
        Ok(definition)
    }

    /// Parse a courier definition from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        check_content_size(content)?;
        let definition: Self = serde_json::from_str(content)?;
        definition.validate()?;
        tracing::debug!(
            courier = %definition.code,
            formats = definition.formats.len(),
            "Parsed courier definition"
        );
        Ok(definition)
    }

    /// Check structural constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.code.trim().is_empty() {
            return Err(EngineError::Configuration(
                "Courier definition requires a name and courier_code".to_string(),
            ));
        }

        if self.formats.is_empty() {
            return Err(EngineError::Configuration(format!(
                "Courier '{}' defines no tracking number formats",
                self.code
            )));
        }

        if self.formats.len() > config::MAX_FORMATS_PER_COURIER {
            return Err(EngineError::LoadError(format!(
                "Too many formats for courier '{}' ({}, max {})",
                self.code,
                self.formats.len(),
                config::MAX_FORMATS_PER_COURIER
            )));
        }

        for format in &self.formats {
            format.validate(&self.code)?;
        }

        Ok(())
    }
}

fn check_content_size(content: &str) -> Result<()> {
    if content.len() > config::MAX_DEFINITION_SIZE {
        tracing::warn!(
            size = content.len(),
            max = config::MAX_DEFINITION_SIZE,
            "Courier definition exceeds size limit"
        );
        return Err(EngineError::LoadError(format!(
            "Definition exceeds maximum size limit ({} bytes)",
            config::MAX_DEFINITION_SIZE
        )));
    }
    Ok(())
}

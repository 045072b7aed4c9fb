//! Tracking number record
//!
//! [`TrackingNumber`] is the public result of identification. It owns the
//! raw input, the normalized number and at most one retained match, and
//! derives everything else from that match on demand. The retained match is
//! private: nothing about a record can change after construction.

use crate::courier::LookupEntry;
use crate::engine::FormatMatch;
use crate::error::{EngineError, Result};
use crate::registry::CourierRegistry;
use crate::types::Captures;
use serde::{Serialize, Serializer};
use std::fmt;

/// Additional attribute naming the service level
pub const SERVICE_TYPE_ATTRIBUTE: &str = "Service Type";
/// Additional attribute naming the package or container type
pub const CONTAINER_TYPE_ATTRIBUTE: &str = "Container Type";
/// Additional attribute carrying a rebranding block
pub const COURIER_ATTRIBUTE: &str = "Courier";

const SHIPPER_ID_GROUP: &str = "ShipperId";
const DESTINATION_ZIP_GROUP: &str = "DestinationZip";

/// Placeholder in tracking URL templates
const TRACKING_URL_PLACEHOLDER: &str = "%s";

/// Courier identity as presented to the user, after rebranding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourierInfo {
    pub name: String,
    pub courier_code: String,
}

/// Serializable snapshot of everything derived from a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingInfo {
    pub tracking_number: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier: Option<CourierInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Captures>,
}

/// Remove all whitespace and upper-case the input.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// An identified (or unidentified) tracking number.
#[derive(Debug, Clone)]
pub struct TrackingNumber {
    original_number: String,
    tracking_number: String,
    matched: Option<FormatMatch>,
}

impl TrackingNumber {
    /// Normalize the input and scan the registry for it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingInput` if no input is given or it is
    /// blank once whitespace is removed.
    pub fn new(registry: &CourierRegistry, input: Option<&str>) -> Result<Self> {
        let original_number = input.ok_or(EngineError::MissingInput)?;
        let tracking_number = normalize(original_number);

        if tracking_number.is_empty() {
            return Err(EngineError::MissingInput);
        }

        let matched = registry.scan(&tracking_number);

        Ok(Self {
            original_number: original_number.to_string(),
            tracking_number,
            matched,
        })
    }

    /// The input exactly as supplied.
    pub fn original_number(&self) -> &str {
        &self.original_number
    }

    /// The normalized number (no whitespace, upper case).
    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    /// Whether some courier format matched and validated.
    pub fn is_valid(&self) -> bool {
        self.matched.is_some()
    }

    /// Name of the matched format descriptor.
    pub fn format_name(&self) -> Option<&str> {
        self.matched.as_ref()?.format_name.as_deref()
    }

    /// Resolved additional attribute by name.
    pub fn additional(&self, name: &str) -> Option<&LookupEntry> {
        self.matched.as_ref()?.additional.get(name)
    }

    fn courier_override(&self) -> Option<&crate::courier::CourierOverride> {
        self.additional(COURIER_ATTRIBUTE)?.courier.as_ref()
    }

    /// Courier name, preferring a rebranding block's name.
    pub fn courier_name(&self) -> Option<&str> {
        let matched = self.matched.as_ref()?;
        let rebranded = self.courier_override().and_then(|o| o.name.as_deref());
        Some(rebranded.unwrap_or(&matched.courier_name))
    }

    /// Courier code, preferring a rebranding block's code.
    pub fn courier_code(&self) -> Option<&str> {
        let matched = self.matched.as_ref()?;
        let rebranded = self.courier_override().and_then(|o| o.code.as_deref());
        Some(rebranded.unwrap_or(&matched.courier_code))
    }

    /// Courier identity: the base courier with rebranded fields applied.
    pub fn courier_info(&self) -> Option<CourierInfo> {
        Some(CourierInfo {
            name: self.courier_name()?.to_string(),
            courier_code: self.courier_code()?.to_string(),
        })
    }

    pub fn service_type(&self) -> Option<&str> {
        self.additional(SERVICE_TYPE_ATTRIBUTE)?.name.as_deref()
    }

    pub fn service_description(&self) -> Option<&str> {
        self.additional(SERVICE_TYPE_ATTRIBUTE)?
            .description
            .as_deref()
    }

    pub fn package_type(&self) -> Option<&str> {
        self.additional(CONTAINER_TYPE_ATTRIBUTE)?.name.as_deref()
    }

    pub fn shipper_id(&self) -> Option<&str> {
        self.captured(SHIPPER_ID_GROUP)
    }

    pub fn destination_zip(&self) -> Option<&str> {
        self.captured(DESTINATION_ZIP_GROUP)
    }

    /// Tracking URL for this number.
    ///
    /// Uses the rebranding block's template when it has one, otherwise the
    /// matched format's own template.
    pub fn tracking_url(&self) -> Option<String> {
        let matched = self.matched.as_ref()?;
        let template = self
            .courier_override()
            .and_then(|o| o.tracking_url.as_deref())
            .or(matched.tracking_url.as_deref())?;

        Some(template.replacen(TRACKING_URL_PLACEHOLDER, &self.tracking_number, 1))
    }

    /// All named groups captured by the matched format.
    pub fn decode(&self) -> Option<&Captures> {
        self.matched.as_ref().map(|m| &m.captures)
    }

    /// Snapshot of all derived properties.
    pub fn info(&self) -> TrackingInfo {
        TrackingInfo {
            tracking_number: self.tracking_number.clone(),
            valid: self.is_valid(),
            courier: self.courier_info(),
            service_type: self.service_type().map(str::to_string),
            service_description: self.service_description().map(str::to_string),
            destination_zip: self.destination_zip().map(str::to_string),
            shipper_id: self.shipper_id().map(str::to_string),
            package_type: self.package_type().map(str::to_string),
            tracking_url: self.tracking_url(),
            decoded: self.decode().cloned(),
        }
    }

    fn captured(&self, group: &str) -> Option<&str> {
        self.matched.as_ref()?.captures.get(group).map(String::as_str)
    }
}

impl Serialize for TrackingNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.info().serialize(serializer)
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tracking_number)
    }
}

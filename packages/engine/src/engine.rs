//! Format matching engine
//!
//! Evaluates a single format descriptor against a normalized tracking number:
//!
//! 1. Run the descriptor's pattern and collect named groups.
//! 2. Apply the serial number rewrite, if the descriptor has one.
//! 3. Validate `SerialNumber` against `CheckDigit` with the descriptor's checksum.
//! 4. Resolve additional attributes from the lookup tables.
//! 5. Reject the candidate if a required attribute did not resolve.
//!
//! # Example
//!
//! ```ignore
//! use tracknum_engine::{CourierDefinition, FormatEngine};
//!
//! let courier = CourierDefinition::from_file("data/couriers/ups.yaml")?;
//! let engine = FormatEngine::new(&courier, &courier.formats[0]);
//!
//! if let Some(found) = engine.evaluate("1Z5R89390357567127") {
//!     println!("Groups: {:?}", found.captures);
//! }
//! ```

use crate::additional::{first_missing, resolve_additional};
use crate::courier::{
    CourierDefinition, FormatDescriptor, LookupEntry, CHECK_DIGIT_GROUP, SERIAL_NUMBER_GROUP,
};
use crate::types::Captures;
use std::collections::BTreeMap;

/// A format that matched, passed its checksum and resolved all required attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatMatch {
    /// Base courier name (before any rebranding)
    pub courier_name: String,
    /// Base courier code (before any rebranding)
    pub courier_code: String,
    /// Name of the matched format descriptor
    pub format_name: Option<String>,
    /// The descriptor's own tracking URL template
    pub tracking_url: Option<String>,
    /// Named groups, after the serial number rewrite
    pub captures: Captures,
    /// Resolved additional attributes by name
    pub additional: BTreeMap<String, LookupEntry>,
}

/// Evaluates one format descriptor of one courier.
pub struct FormatEngine<'a> {
    courier: &'a CourierDefinition,
    format: &'a FormatDescriptor,
}

impl<'a> FormatEngine<'a> {
    /// Create a new format engine.
    ///
    /// # Arguments
    /// * `courier` - Courier owning the format
    /// * `format` - Format descriptor to evaluate
    pub fn new(courier: &'a CourierDefinition, format: &'a FormatDescriptor) -> Self {
        Self { courier, format }
    }

    /// Evaluate the format against a normalized tracking number.
    ///
    /// # Returns
    /// * `Some(FormatMatch)` - All validation steps passed
    /// * `None` - No match, checksum failure, or missing required attribute
    pub fn evaluate(&self, tracking_number: &str) -> Option<FormatMatch> {
        let mut captures = self.format.pattern.captures(tracking_number)?;

        tracing::debug!(
            courier = %self.courier.code,
            format = ?self.format.name,
            "Pattern matched"
        );

        self.rewrite_serial_number(&mut captures);

        if !self.checksum_passes(&captures) {
            tracing::debug!(
                courier = %self.courier.code,
                format = ?self.format.name,
                checksum = self.format.checksum().name(),
                "Checksum rejected candidate"
            );
            return None;
        }

        let resolved = resolve_additional(&self.format.lookups, &captures);

        if let Some(missing) = first_missing(self.format.required_attributes(), &resolved) {
            tracing::debug!(
                courier = %self.courier.code,
                format = ?self.format.name,
                attribute = missing,
                "Required attribute not resolved"
            );
            return None;
        }

        let additional = resolved
            .into_iter()
            .map(|(name, entry)| (name.to_string(), entry.clone()))
            .collect();

        Some(FormatMatch {
            courier_name: self.courier.name.clone(),
            courier_code: self.courier.code.clone(),
            format_name: self.format.name.clone(),
            tracking_url: self.format.tracking_url.clone(),
            captures,
            additional,
        })
    }

    /// Prepend the configured content when the serial number matches the trigger.
    fn rewrite_serial_number(&self, captures: &mut Captures) {
        let Some(rule) = self.format.serial_number_rewrite() else {
            return;
        };

        if let Some(serial) = captures.get_mut(SERIAL_NUMBER_GROUP) {
            if rule.matches_regex.is_match(serial) {
                serial.insert_str(0, &rule.content);
                tracing::debug!(serial = %serial, "Rewrote serial number");
            }
        }
    }

    fn checksum_passes(&self, captures: &Captures) -> bool {
        match (
            captures.get(SERIAL_NUMBER_GROUP),
            captures.get(CHECK_DIGIT_GROUP),
        ) {
            (Some(serial), Some(check_digit)) => {
                self.format.checksum().validate(serial, check_digit)
            }
            _ => false,
        }
    }
}

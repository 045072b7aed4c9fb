//! Core types for the tracking number engine

use std::collections::BTreeMap;

/// Named capture groups extracted by a successful pattern match.
///
/// Groups that did not participate in the match are absent.
pub type Captures = BTreeMap<String, String>;

/// Untyped attribute carried by a lookup entry (e.g. `country`,
/// `upu_reference_url`).
pub type AttributeValue = serde_json::Value;

//! Additional attribute resolution
//!
//! Resolves metadata such as service type, container type, or a rebranding
//! courier from lookup tables keyed by captured group values.
//!
//! Every entry of every lookup is tried. When several entries select the same
//! captured value, the last one wins; the scan does not stop at the first hit.

use crate::courier::{AdditionalLookup, LookupEntry};
use crate::types::Captures;
use std::collections::BTreeMap;

/// Attribute name to the lookup entry that resolved it.
pub type ResolvedAttributes<'a> = BTreeMap<&'a str, &'a LookupEntry>;

/// Resolve all lookups of a format against the captured groups.
///
/// A lookup whose group did not participate in the match resolves nothing.
pub fn resolve_additional<'a>(
    lookups: &'a [AdditionalLookup],
    captures: &Captures,
) -> ResolvedAttributes<'a> {
    let mut resolved = ResolvedAttributes::new();

    for lookup in lookups {
        let Some(value) = captures.get(&lookup.group) else {
            continue;
        };

        for entry in &lookup.entries {
            if entry.matches_value(value) {
                resolved.insert(lookup.name.as_str(), entry);
            }
        }
    }

    resolved
}

/// First required attribute that did not resolve, if any.
pub fn first_missing<'r>(
    required: &'r [String],
    resolved: &ResolvedAttributes<'_>,
) -> Option<&'r str> {
    required
        .iter()
        .map(String::as_str)
        .find(|name| !resolved.contains_key(name))
}

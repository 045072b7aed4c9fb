//! Configuration constants for the tracking number engine
//!
//! Centralized limits applied while loading courier definitions:
//! - Document size limits (prevent YAML bombs)
//! - Collection size limits (keep the exhaustive scan bounded)
//! - Compiled pattern size limits (prevent regex blow-up)
//!
//! The scan over a registry visits every format of every courier, so
//! these limits are also what keeps identification cheap.

/// Maximum number of couriers that can be loaded into one registry.
pub const MAX_LOADED_COURIERS: usize = 100;

/// Maximum courier definition document size in bytes (1 MB).
///
/// Upstream definition files are 5-50 KB.
pub const MAX_DEFINITION_SIZE: usize = 1_000_000;

/// Maximum number of tracking number formats per courier.
pub const MAX_FORMATS_PER_COURIER: usize = 64;

/// Maximum number of lookup rules per format, and entries per lookup rule.
///
/// Country tables for S10 numbers are the largest known lookups (~250 entries).
pub const MAX_LOOKUP_ENTRIES: usize = 1_000;

/// Size limit in bytes for a single compiled pattern.
pub const MAX_COMPILED_PATTERN_SIZE: usize = 1 << 20;

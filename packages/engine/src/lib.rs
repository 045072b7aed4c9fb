//! Tracking number engine
//!
//! Identifies the courier that issued a tracking number, validates its check
//! digit and decodes the metadata carried in its digits.
//! This library provides functionality for:
//! - Loading data-driven courier definitions (YAML or JSON)
//! - Matching free-spacing patterns with named capture groups
//! - Check digit validation (mod10, mod7, S10, weighted double modulo)
//! - Resolving service type, container type and rebranded couriers
//!
//! # Example
//!
//! ```ignore
//! use tracknum_engine::CourierRegistry;
//!
//! let registry = CourierRegistry::bundled()?;
//! let tracking = registry.identify("RB123456785GB")?;
//!
//! assert!(tracking.is_valid());
//! assert_eq!(tracking.courier_name(), Some("Royal Mail Group plc"));
//! assert_eq!(tracking.service_type(), Some("Letter Post Registered"));
//! ```

pub mod additional;
pub mod checksum;
pub mod config;
pub mod courier;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod tracking;
pub mod types;

// Re-export commonly used items
pub use checksum::Checksum;
pub use courier::{
    AdditionalLookup, CourierDefinition, CourierOverride, FormatDescriptor, LookupEntry,
    Validation,
};
pub use engine::{FormatEngine, FormatMatch};
pub use error::{EngineError, Result};
pub use pattern::Pattern;
pub use registry::CourierRegistry;
pub use tracking::{CourierInfo, TrackingInfo, TrackingNumber};
pub use types::{AttributeValue, Captures};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

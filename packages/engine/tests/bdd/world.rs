//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use cucumber::World;
use std::fmt;
use tracknum_engine::{CourierRegistry, EngineError, TrackingNumber};

use crate::helpers::courier_loader::load_all_couriers;

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(World)]
#[world(init = Self::new)]
pub struct TrackingWorld {
    /// Registry scanned by the `When` steps
    pub registry: CourierRegistry,
    /// Last identification result (if successful)
    pub result: Option<TrackingNumber>,
    /// Last error (if identification failed)
    pub error: Option<EngineError>,
}

impl fmt::Debug for TrackingWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingWorld")
            .field(
                "registry",
                &format!("<{} couriers loaded>", self.registry.courier_count()),
            )
            .field("result", &self.result)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl Default for TrackingWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingWorld {
    /// Create a new world with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: CourierRegistry::new(),
            result: None,
            error: None,
        }
    }

    /// Load the shipped courier definitions into the registry.
    pub fn load_shipped_couriers(&mut self) {
        if let Err(e) = load_all_couriers(&mut self.registry) {
            panic!("Failed to load couriers: {}", e);
        }
    }

    /// Identify a tracking number and store the result or error
    pub fn identify(&mut self, input: Option<&str>) {
        match TrackingNumber::new(&self.registry, input) {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e);
            }
        }
    }

    /// The last result, failing the step if identification errored.
    pub fn tracking(&self) -> &TrackingNumber {
        match &self.result {
            Some(tracking) => tracking,
            None => panic!(
                "Expected an identification result, got error: {:?}",
                self.error_message()
            ),
        }
    }

    /// Look up a derived property by its human-readable name.
    pub fn property(&self, name: &str) -> Option<String> {
        let tracking = self.tracking();
        let value = match name {
            "courier name" => tracking.courier_name(),
            "courier code" => tracking.courier_code(),
            "service type" => tracking.service_type(),
            "service description" => tracking.service_description(),
            "package type" => tracking.package_type(),
            "shipper id" => tracking.shipper_id(),
            "destination zip" => tracking.destination_zip(),
            "format" => tracking.format_name(),
            "normalized tracking number" => Some(tracking.tracking_number()),
            "tracking url" => return tracking.tracking_url(),
            other => panic!("Unknown tracking number property: {}", other),
        };
        value.map(str::to_string)
    }

    /// Get error message if identification failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::TrackingWorld;

    #[test]
    fn test_world_loads_shipped_couriers() {
        let mut world = TrackingWorld::new();
        world.load_shipped_couriers();
        assert!(
            world.registry.courier_count() > 0,
            "Expected at least one courier to be loaded"
        );
    }
}

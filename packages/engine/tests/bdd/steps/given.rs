//! Given step definitions
//!
//! Steps that set up the courier registry for a scenario.

use cucumber::{gherkin::Step, given};

use crate::world::TrackingWorld;

#[given("the shipped courier definitions")]
fn load_shipped_couriers(world: &mut TrackingWorld) {
    world.load_shipped_couriers();
}

#[given("an empty courier registry")]
fn empty_registry(world: &mut TrackingWorld) {
    world.registry = tracknum_engine::CourierRegistry::new();
}

#[given("the following courier definition:")]
fn load_courier_definition(world: &mut TrackingWorld, step: &Step) {
    let yaml = step
        .docstring
        .as_ref()
        .expect("Courier definition step requires a docstring");

    if let Err(e) = world.registry.load_courier(yaml) {
        panic!("Failed to load courier definition: {}", e);
    }
}

//! When step definitions
//!
//! Steps that run identification.

use cucumber::when;

use crate::world::TrackingWorld;

#[when(regex = r#"^I identify the tracking number "([^"]*)"$"#)]
fn identify_tracking_number(world: &mut TrackingWorld, input: String) {
    world.identify(Some(input.as_str()));
}

#[when("I identify without a tracking number")]
fn identify_without_input(world: &mut TrackingWorld) {
    world.identify(None);
}

//! Then step definitions
//!
//! Steps that verify identification outcomes.

use cucumber::then;
use tracknum_engine::EngineError;

use crate::world::TrackingWorld;

#[then("the tracking number is valid")]
fn assert_valid(world: &mut TrackingWorld) {
    assert!(
        world.tracking().is_valid(),
        "Expected {} to be valid",
        world.tracking().tracking_number()
    );
}

#[then("the tracking number is not valid")]
fn assert_not_valid(world: &mut TrackingWorld) {
    let tracking = world.tracking();
    assert!(
        !tracking.is_valid(),
        "Expected {} to be invalid, matched {:?}",
        tracking.tracking_number(),
        tracking.courier_code()
    );
}

#[then(regex = r#"^the ([a-z ]+) is "([^"]*)"$"#)]
fn assert_property(world: &mut TrackingWorld, property: String, expected: String) {
    let actual = world.property(&property);
    assert_eq!(
        actual.as_deref(),
        Some(expected.as_str()),
        "Expected {} to be {:?}, got {:?}",
        property,
        expected,
        actual
    );
}

#[then(regex = r"^there is no ([a-z ]+)$")]
fn assert_no_property(world: &mut TrackingWorld, property: String) {
    let actual = world.property(&property);
    assert_eq!(actual, None, "Expected no {}, got {:?}", property, actual);
}

#[then("the tracking url contains the tracking number")]
fn assert_url_contains_number(world: &mut TrackingWorld) {
    let tracking = world.tracking();
    let url = tracking
        .tracking_url()
        .unwrap_or_else(|| panic!("Expected a tracking url for {}", tracking));
    assert!(
        url.contains(tracking.tracking_number()),
        "Expected {} to contain {}",
        url,
        tracking.tracking_number()
    );
}

#[then(regex = r#"^the decoded "([A-Za-z]+)" is "([^"]*)"$"#)]
fn assert_decoded_group(world: &mut TrackingWorld, group: String, expected: String) {
    let decoded = world
        .tracking()
        .decode()
        .expect("Expected decoded groups for a valid tracking number");
    assert_eq!(
        decoded.get(&group).map(String::as_str),
        Some(expected.as_str()),
        "Unexpected value for group {}",
        group
    );
}

#[then("identification fails with a missing input error")]
fn assert_missing_input(world: &mut TrackingWorld) {
    assert!(
        matches!(world.error, Some(EngineError::MissingInput)),
        "Expected MissingInput error, got {:?}",
        world.error_message()
    );
}

//! Courier registry
//!
//! Holds the ordered list of courier definitions and runs the identification
//! scan over it.
//!
//! # Scan order
//!
//! Identification visits every format of every courier in registry order and
//! does not stop at the first success. Each candidate that passes replaces the
//! one retained before it, so the *last* passing format in registry order is
//! the one reported.
//!
//! # Security
//!
//! The registry enforces a maximum number of loaded couriers (see
//! [`crate::config::MAX_LOADED_COURIERS`]).

use crate::config;
use crate::courier::CourierDefinition;
use crate::engine::{FormatEngine, FormatMatch};
use crate::error::{EngineError, Result};
use crate::tracking::TrackingNumber;
use std::fs;
use std::path::Path;

/// Courier definitions shipped with the crate, in scan order.
const BUNDLED_COURIERS: [(&str, &str); 6] = [
    ("dhl.yaml", include_str!("../data/couriers/dhl.yaml")),
    ("fedex.yaml", include_str!("../data/couriers/fedex.yaml")),
    ("ontrac.yaml", include_str!("../data/couriers/ontrac.yaml")),
    ("s10.yaml", include_str!("../data/couriers/s10.yaml")),
    ("ups.yaml", include_str!("../data/couriers/ups.yaml")),
    ("usps.yaml", include_str!("../data/couriers/usps.yaml")),
];

/// Ordered, read-only collection of courier definitions.
///
/// Once loaded, a registry is only read, so a single instance can be shared
/// across threads (`&CourierRegistry` is `Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use tracknum_engine::CourierRegistry;
///
/// let registry = CourierRegistry::bundled()?;
/// let tracking = registry.identify("1Z5R89390357567127")?;
///
/// assert_eq!(tracking.courier_name(), Some("UPS"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CourierRegistry {
    couriers: Vec<CourierDefinition>,
}

impl CourierRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            couriers: Vec::new(),
        }
    }

    /// Load the courier definitions bundled with the crate.
    pub fn bundled() -> Result<Self> {
        let mut registry = Self::new();
        for (file_name, content) in BUNDLED_COURIERS {
            let definition = CourierDefinition::from_yaml_str(content).map_err(|e| {
                tracing::error!(file = file_name, error = %e, "Bundled courier definition is invalid");
                e
            })?;
            registry.add_courier(definition)?;
        }
        Ok(registry)
    }

    /// Load every `.yaml`, `.yml` and `.json` definition in a directory.
    ///
    /// Files are loaded in file name order, which becomes the scan order.
    ///
    /// # Errors
    ///
    /// Any directory entry or file that fails to load aborts the whole load.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "json")
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in &paths {
            registry.load_file(path)?;
        }

        tracing::info!(
            dir = %dir.display(),
            count = registry.courier_count(),
            "Loaded courier definitions"
        );
        Ok(registry)
    }

    /// Add a parsed courier definition at the end of the scan order.
    ///
    /// A definition with the same courier code as a loaded one replaces it in
    /// place, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LoadError` if [`config::MAX_LOADED_COURIERS`]
    /// would be exceeded.
    pub fn add_courier(&mut self, definition: CourierDefinition) -> Result<()> {
        if let Some(existing) = self.couriers.iter_mut().find(|c| c.code == definition.code) {
            tracing::debug!(courier = %definition.code, "Replacing existing courier");
            *existing = definition;
            return Ok(());
        }

        if self.couriers.len() >= config::MAX_LOADED_COURIERS {
            tracing::warn!(
                current = self.couriers.len(),
                max = config::MAX_LOADED_COURIERS,
                courier = %definition.code,
                "Maximum courier count exceeded"
            );
            return Err(EngineError::LoadError(format!(
                "Maximum number of couriers exceeded ({} couriers)",
                config::MAX_LOADED_COURIERS
            )));
        }

        tracing::debug!(
            courier = %definition.code,
            formats = definition.formats.len(),
            total = self.couriers.len() + 1,
            "Courier loaded"
        );
        self.couriers.push(definition);
        Ok(())
    }

    /// Load a courier definition from a YAML string.
    ///
    /// # Returns
    /// The courier code of the loaded definition.
    pub fn load_courier(&mut self, yaml: &str) -> Result<String> {
        let definition = CourierDefinition::from_yaml_str(yaml)?;
        let code = definition.code.clone();
        self.add_courier(definition)?;
        Ok(code)
    }

    /// Load a courier definition from a JSON string.
    pub fn load_courier_json(&mut self, json: &str) -> Result<String> {
        let definition = CourierDefinition::from_json_str(json)?;
        let code = definition.code.clone();
        self.add_courier(definition)?;
        Ok(code)
    }

    /// Load a courier definition file (YAML, or JSON by extension).
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let definition = CourierDefinition::from_file(path)?;
        let code = definition.code.clone();
        self.add_courier(definition)?;
        Ok(code)
    }

    /// Identify a raw tracking number.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingInput` if the input is blank. A number no
    /// courier recognises is not an error; the record is simply invalid.
    pub fn identify(&self, input: &str) -> Result<TrackingNumber> {
        TrackingNumber::new(self, Some(input))
    }

    /// Scan all formats against a normalized tracking number.
    ///
    /// Returns the last passing candidate in registry order.
    pub fn scan(&self, tracking_number: &str) -> Option<FormatMatch> {
        let mut retained: Option<FormatMatch> = None;

        for courier in &self.couriers {
            for format in &courier.formats {
                let Some(found) = FormatEngine::new(courier, format).evaluate(tracking_number)
                else {
                    continue;
                };

                if let Some(previous) = &retained {
                    tracing::debug!(
                        previous_courier = %previous.courier_code,
                        previous_format = ?previous.format_name,
                        courier = %found.courier_code,
                        format = ?found.format_name,
                        "Later candidate replaces retained match"
                    );
                }
                retained = Some(found);
            }
        }

        match &retained {
            Some(found) => tracing::debug!(
                courier = %found.courier_code,
                format = ?found.format_name,
                "Tracking number identified"
            ),
            None => tracing::debug!("No courier format matched"),
        }

        retained
    }

    /// All loaded couriers in scan order.
    pub fn couriers(&self) -> &[CourierDefinition] {
        &self.couriers
    }

    /// Courier codes in scan order.
    pub fn list_couriers(&self) -> Vec<&str> {
        self.couriers.iter().map(|c| c.code.as_str()).collect()
    }

    /// Number of loaded couriers.
    pub fn courier_count(&self) -> usize {
        self.couriers.len()
    }

    /// Total number of formats across all couriers.
    pub fn format_count(&self) -> usize {
        self.couriers.iter().map(|c| c.formats.len()).sum()
    }

    /// Check if a courier is loaded.
    pub fn has_courier(&self, code: &str) -> bool {
        self.couriers.iter().any(|c| c.code == code)
    }

    /// Get a courier by code.
    pub fn get_courier(&self, code: &str) -> Option<&CourierDefinition> {
        self.couriers.iter().find(|c| c.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_courier(code: &str, tracking_url: &str) -> String {
        format!(
            r#"
name: Courier {code}
courier_code: {code}
tracking_numbers:
  - name: {code} 10
    regex: '^ (?<SerialNumber> [0-9]{{9}} ) (?<CheckDigit> [0-9] ) $'
    validation:
      checksum:
        name: mod7
    tracking_url: '{tracking_url}'
"#
        )
    }

    #[test]
    fn test_registry_basic() {
        let mut registry = CourierRegistry::new();

        let code = registry
            .load_courier(&make_courier("first", "https://first.test/%s"))
            .unwrap();
        assert_eq!(code, "first");

        assert!(registry.has_courier("first"));
        assert!(!registry.has_courier("nonexistent"));
        assert_eq!(registry.courier_count(), 1);
        assert_eq!(registry.format_count(), 1);
        assert_eq!(registry.get_courier("first").unwrap().name, "Courier first");
    }

    #[test]
    fn test_registry_preserves_load_order() {
        let mut registry = CourierRegistry::new();
        registry.load_courier(&make_courier("zulu", "z/%s")).unwrap();
        registry.load_courier(&make_courier("alpha", "a/%s")).unwrap();

        assert_eq!(registry.list_couriers(), vec!["zulu", "alpha"]);
    }

    #[test]
    fn test_registry_replaces_same_code_in_place() {
        let mut registry = CourierRegistry::new();
        registry.load_courier(&make_courier("one", "old/%s")).unwrap();
        registry.load_courier(&make_courier("two", "two/%s")).unwrap();
        registry.load_courier(&make_courier("one", "new/%s")).unwrap();

        assert_eq!(registry.list_couriers(), vec!["one", "two"]);
        assert_eq!(
            registry.get_courier("one").unwrap().formats[0].tracking_url.as_deref(),
            Some("new/%s")
        );
    }

    #[test]
    fn test_scan_last_match_wins() {
        let mut registry = CourierRegistry::new();
        registry.load_courier(&make_courier("first", "first/%s")).unwrap();
        registry.load_courier(&make_courier("second", "second/%s")).unwrap();

        // 331881002 % 7 == 5: both couriers accept it
        let found = registry.scan("3318810025").unwrap();
        assert_eq!(found.courier_code, "second");
    }

    #[test]
    fn test_scan_no_match() {
        let mut registry = CourierRegistry::new();
        registry.load_courier(&make_courier("first", "first/%s")).unwrap();

        assert!(registry.scan("3318810024").is_none());
        assert!(registry.scan("101").is_none());
    }

    #[test]
    fn test_registry_courier_limit() {
        let mut registry = CourierRegistry::new();
        for i in 0..config::MAX_LOADED_COURIERS {
            registry
                .load_courier(&make_courier(&format!("c{}", i), "x/%s"))
                .unwrap();
        }

        let err = registry
            .load_courier(&make_courier("overflow", "x/%s"))
            .unwrap_err();
        assert!(matches!(err, EngineError::LoadError(_)));
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tracknum-registry-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_from_dir_loads_in_file_name_order() {
        let dir = scratch_dir("order");
        fs::write(dir.join("b.yaml"), make_courier("bravo", "b/%s")).unwrap();
        fs::write(dir.join("a.yml"), make_courier("alpha", "a/%s")).unwrap();
        fs::write(dir.join("notes.txt"), "not a courier").unwrap();

        let registry = CourierRegistry::from_dir(&dir).unwrap();
        assert_eq!(registry.list_couriers(), vec!["alpha", "bravo"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_dir_aborts_on_bad_file() {
        let dir = scratch_dir("abort");
        fs::write(dir.join("a.yaml"), make_courier("alpha", "a/%s")).unwrap();
        fs::write(dir.join("b.yaml"), "name: Broken\ncourier_code: broken\n").unwrap();

        let err = CourierRegistry::from_dir(&dir).unwrap_err();
        assert!(err.is_configuration_error());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_dir_missing_directory_fails() {
        let dir = std::env::temp_dir().join("tracknum-registry-does-not-exist");
        let err = CourierRegistry::from_dir(&dir).unwrap_err();
        assert!(matches!(err, EngineError::IoError(_)));
    }

    #[test]
    fn test_bundled_registry() {
        let registry = CourierRegistry::bundled().unwrap();
        assert_eq!(
            registry.list_couriers(),
            vec!["dhl", "fedex", "ontrac", "s10", "ups", "usps"]
        );
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CourierRegistry>();
    }
}

//! Courier loader for BDD tests
//!
//! Loads every courier definition from the package's `data/couriers` directory.

use tracknum_engine::{CourierRegistry, EngineError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding the shipped courier definitions.
pub fn courier_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("couriers")
}

/// Load all courier YAML files into the registry, in file name order.
///
/// Returns the number of definitions loaded.
pub fn load_all_couriers(registry: &mut CourierRegistry) -> Result<usize, EngineError> {
    let data_dir = courier_data_dir();

    if !data_dir.exists() {
        return Err(EngineError::LoadError(format!(
            "Courier directory not found: {}",
            data_dir.display()
        )));
    }

    let mut count = 0;

    for entry in WalkDir::new(&data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "yaml") {
            registry.load_file(path).map_err(|e| {
                EngineError::LoadError(format!("Failed to load {}: {}", path.display(), e))
            })?;
            count += 1;
        }
    }

    Ok(count)
}

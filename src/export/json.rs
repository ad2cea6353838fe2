//! JSON import/export for question catalogs.
//! Catalogs are the read-only input to the engines, so this is the only
//! place that writes them.

use crate::models::QuestionCatalog;
use std::fs::File;
use std::io::{Read, Write};

/// Writes a catalog to a JSON file at the specified path.
pub fn export_catalog(
    catalog: &QuestionCatalog,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_string = serde_json::to_string_pretty(catalog)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Reads a catalog from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_catalog(path: &str) -> Result<QuestionCatalog, Box<dyn std::error::Error>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let catalog: QuestionCatalog = serde_json::from_str(&contents)?;
    Ok(catalog)
}

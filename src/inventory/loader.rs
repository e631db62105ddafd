//! Load component inventories from CSV or JSON
//!
//! The CSV layout is fixed:
//! `name,category,useful_life,remaining_life,replacement_cost,quantity,unit,description`
//! (the last three columns may be empty or omitted).

use super::{Component, ComponentRecord};
use crate::error::LoadError;
use crate::validation::validate_components;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read raw records from any CSV reader without validating them
pub fn read_component_records<R: Read>(reader: R) -> Result<Vec<ComponentRecord>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: ComponentRecord = result?;
        records.push(record);
    }

    log::debug!("read {} component records", records.len());
    Ok(records)
}

/// Load and validate an inventory from a CSV file
pub fn load_components<P: AsRef<Path>>(path: P) -> Result<Vec<Component>, LoadError> {
    let file = File::open(path)?;
    load_components_from_reader(file)
}

/// Load and validate an inventory from any CSV reader (e.g., string buffer, network stream)
pub fn load_components_from_reader<R: Read>(reader: R) -> Result<Vec<Component>, LoadError> {
    let records = read_component_records(reader)?;
    Ok(validate_components(&records)?)
}

/// Read raw records from a JSON array
pub fn load_component_records_json<R: Read>(reader: R) -> Result<Vec<ComponentRecord>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

//! Component inventory data structures and loading

mod data;
pub mod loader;

pub use data::{Component, ComponentCategory, ComponentRecord};
pub use loader::{load_components, load_components_from_reader, load_component_records_json};

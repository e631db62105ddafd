//! Component inventory data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SIRS component category
///
/// Informational only: the projection never branches on category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    /// Roof
    Roof,
    /// Load-bearing walls and primary structural members
    Structure,
    /// Fireproofing and fire protection systems
    Fireproofing,
    Plumbing,
    Electrical,
    /// Waterproofing and exterior painting
    Waterproofing,
    /// Exterior windows and doors
    WindowsAndDoors,
    /// Any other item over the deferred maintenance threshold
    #[default]
    #[serde(other)]
    Other,
}

impl ComponentCategory {
    /// Display label used in inventory tables
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentCategory::Roof => "Roof",
            ComponentCategory::Structure => "Structure",
            ComponentCategory::Fireproofing => "Fireproofing",
            ComponentCategory::Plumbing => "Plumbing",
            ComponentCategory::Electrical => "Electrical",
            ComponentCategory::Waterproofing => "Waterproofing",
            ComponentCategory::WindowsAndDoors => "Windows and Doors",
            ComponentCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentCategory {
    type Err = std::convert::Infallible;

    /// Lenient parse for hand-entered inventories; unknown labels map to `Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        Ok(match normalized.as_str() {
            "roof" | "roofing" => ComponentCategory::Roof,
            "structure" | "structural" => ComponentCategory::Structure,
            "fireproofing" | "fireprotection" => ComponentCategory::Fireproofing,
            "plumbing" => ComponentCategory::Plumbing,
            "electrical" => ComponentCategory::Electrical,
            "waterproofing" | "exteriorpainting" | "painting" => ComponentCategory::Waterproofing,
            "windowsanddoors" | "windows" | "doors" | "windowsdoors" => {
                ComponentCategory::WindowsAndDoors
            }
            _ => ComponentCategory::Other,
        })
    }
}

/// A single building component in the reserve inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name (not required to be unique)
    pub name: String,

    /// SIRS category
    #[serde(default)]
    pub category: ComponentCategory,

    /// Total expected life when new, in years
    pub useful_life: f64,

    /// Years until the next replacement is due
    pub remaining_life: f64,

    /// Cost to replace at the end of remaining life
    pub replacement_cost: f64,

    /// Inventory quantity (e.g. 12,500)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    /// Unit of the quantity (e.g. "SF", "EA")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Free-text condition assessment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Component {
    /// Create a component with no optional inventory details
    pub fn new(
        name: impl Into<String>,
        category: ComponentCategory,
        useful_life: f64,
        remaining_life: f64,
        replacement_cost: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            useful_life,
            remaining_life,
            replacement_cost,
            quantity: None,
            unit: None,
            description: None,
        }
    }

    /// Effective age: useful life minus remaining life
    pub fn effective_age(&self) -> f64 {
        self.useful_life - self.remaining_life
    }

    /// Projection year index of the first replacement (floor of remaining life)
    pub fn first_replacement_index(&self) -> usize {
        self.remaining_life.max(0.0).floor() as usize
    }

    /// True when the remaining life extends past a horizon of `years`
    pub fn is_long_life(&self, years: u32) -> bool {
        self.first_replacement_index() >= years as usize
    }

    /// Remaining life exceeds useful life (fully-funded ratio would be negative)
    pub fn is_overlived(&self) -> bool {
        self.remaining_life > self.useful_life
    }
}

/// Raw component record as entered or imported
///
/// Every field is optional so that a whole inventory can be checked and all
/// missing fields reported together. See [`crate::validation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub useful_life: Option<f64>,
    #[serde(default)]
    pub remaining_life: Option<f64>,
    #[serde(default)]
    pub replacement_cost: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Component> for ComponentRecord {
    fn from(component: &Component) -> Self {
        Self {
            name: Some(component.name.clone()),
            category: Some(component.category.as_str().to_string()),
            useful_life: Some(component.useful_life),
            remaining_life: Some(component.remaining_life),
            replacement_cost: Some(component.replacement_cost),
            quantity: component.quantity,
            unit: component.unit.clone(),
            description: component.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Roof".parse::<ComponentCategory>().unwrap(), ComponentCategory::Roof);
        assert_eq!(
            "Windows & Doors".parse::<ComponentCategory>().unwrap(),
            ComponentCategory::WindowsAndDoors
        );
        assert_eq!(
            "exterior painting".parse::<ComponentCategory>().unwrap(),
            ComponentCategory::Waterproofing
        );
        assert_eq!("Pool deck".parse::<ComponentCategory>().unwrap(), ComponentCategory::Other);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ComponentCategory::WindowsAndDoors).unwrap();
        assert_eq!(json, "\"windows_and_doors\"");

        let unknown: ComponentCategory = serde_json::from_str("\"elevator\"").unwrap();
        assert_eq!(unknown, ComponentCategory::Other);
    }

    #[test]
    fn test_effective_age_and_replacement_index() {
        let roof = Component::new("Roof", ComponentCategory::Roof, 25.0, 11.0, 448_800.0);
        assert_eq!(roof.effective_age(), 14.0);
        assert_eq!(roof.first_replacement_index(), 11);
        assert!(!roof.is_long_life(30));
        assert!(roof.is_long_life(11));

        let fractional = Component::new("Paint", ComponentCategory::Waterproofing, 10.0, 3.9, 1.0);
        assert_eq!(fractional.first_replacement_index(), 3);
    }

    #[test]
    fn test_overlived_component() {
        let c = Component::new("Pipes", ComponentCategory::Plumbing, 40.0, 45.0, 10_000.0);
        assert!(c.is_overlived());
        assert_eq!(c.effective_age(), -5.0);
    }
}

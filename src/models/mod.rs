use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of commercial building a listing advertises
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BuildingType {
    #[serde(rename = "oficina")]
    Office,
    #[serde(rename = "local")]
    Store,
    #[serde(rename = "bodega")]
    Warehouse,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::Office => "oficina",
            BuildingType::Store => "local",
            BuildingType::Warehouse => "bodega",
        }
    }

    /// Resolve the lower-cased label left over after stripping modality words
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "oficina" => Some(BuildingType::Office),
            "local" => Some(BuildingType::Store),
            "bodega" => Some(BuildingType::Warehouse),
            _ => None,
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction type of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Modality {
    #[serde(rename = "ninguna")]
    Unspecified,
    #[serde(rename = "arriendo")]
    Rent,
    #[serde(rename = "venta")]
    Sale,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Unspecified => "ninguna",
            Modality::Rent => "arriendo",
            Modality::Sale => "venta",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed commercial listing, ready for persistence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyRecord {
    pub building_type: BuildingType,
    pub modality: Modality,
    pub neighborhood: Option<String>,
    pub city: String,
    /// Colombian pesos, no separators
    pub price_cop: u64,
    /// Square meters as plain decimal text (e.g. "120", "85.5")
    pub area_sq_meters: String,
    pub rooms: u32,
    pub bathrooms: u32,
}

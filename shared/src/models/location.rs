//! Farm location models

use serde::{Deserialize, Serialize};

/// A growing position on the farm. Generated from the catalog, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FarmLocation {
    pub id: String,
    pub structure_type: StructureType,
    pub zone: Zone,
    pub name: String,
}

/// Physical structure a plant is trained on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Greenhouse,
    Trellis,
    DoublePole,
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureType::Greenhouse => write!(f, "Greenhouse"),
            StructureType::Trellis => write!(f, "Trellis"),
            StructureType::DoublePole => write!(f, "Double Pole"),
        }
    }
}

/// Farm zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    North,
    South,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::North, Zone::South];

    /// Single-letter prefix used in location identifiers
    pub fn letter(&self) -> char {
        match self {
            Zone::North => 'N',
            Zone::South => 'S',
        }
    }

    pub fn from_letter(letter: char) -> Option<Zone> {
        match letter {
            'N' => Some(Zone::North),
            'S' => Some(Zone::South),
            _ => None,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::North => write!(f, "North"),
            Zone::South => write!(f, "South"),
        }
    }
}

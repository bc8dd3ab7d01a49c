//! Farm location catalog
//!
//! The catalog is a pure function of the farm's structural constants. It is
//! regenerated on demand and never persisted, so identifiers stay stable as
//! long as these constants do.
//!
//! Identifier formats (zone letter first):
//! - Greenhouse: `{zone}{greenhouse}{row}{pole}`, e.g. `N11A`
//! - Trellis: `{zone}T{trellis}{section}`, e.g. `NT3D`
//! - Double pole: `{zone}DP{U|L}{pole}`, e.g. `NDPU3`

use crate::models::{FarmLocation, StructureType, Zone};

pub const GREENHOUSES_PER_ZONE: u32 = 4;
pub const ROWS_PER_GREENHOUSE: u32 = 3;
pub const POLES_PER_ROW: u32 = 12;
pub const TRELLISES_PER_ZONE: u32 = 4;
pub const SECTIONS_PER_TRELLIS: u32 = 10;
pub const DOUBLE_POLES_PER_POSITION: u32 = 6;

/// Number of entries produced by [`generate_catalog`]
pub const CATALOG_SIZE: usize = (Zone::ALL.len() as u32
    * (GREENHOUSES_PER_ZONE * ROWS_PER_GREENHOUSE * POLES_PER_ROW
        + TRELLISES_PER_ZONE * SECTIONS_PER_TRELLIS
        + DoublePolePosition::ALL.len() as u32 * DOUBLE_POLES_PER_POSITION))
    as usize;

/// Vertical position on a double-pole structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoublePolePosition {
    Upper,
    Lower,
}

impl DoublePolePosition {
    pub const ALL: [DoublePolePosition; 2] = [DoublePolePosition::Upper, DoublePolePosition::Lower];

    fn letter(&self) -> char {
        match self {
            DoublePolePosition::Upper => 'U',
            DoublePolePosition::Lower => 'L',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(DoublePolePosition::Upper),
            'L' => Some(DoublePolePosition::Lower),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DoublePolePosition::Upper => "Upper",
            DoublePolePosition::Lower => "Lower",
        }
    }
}

/// Enumerate every valid farm location.
///
/// Order is deterministic: greenhouses, then trellises, then double poles,
/// each North before South.
pub fn generate_catalog() -> Vec<FarmLocation> {
    let mut locations = Vec::with_capacity(CATALOG_SIZE);

    for zone in Zone::ALL {
        for greenhouse in 1..=GREENHOUSES_PER_ZONE {
            for row in 1..=ROWS_PER_GREENHOUSE {
                for pole in 0..POLES_PER_ROW {
                    locations.push(greenhouse_location(zone, greenhouse, row, ordinal_letter(pole)));
                }
            }
        }
    }

    for zone in Zone::ALL {
        for trellis in 1..=TRELLISES_PER_ZONE {
            for section in 0..SECTIONS_PER_TRELLIS {
                locations.push(trellis_location(zone, trellis, ordinal_letter(section)));
            }
        }
    }

    for zone in Zone::ALL {
        for position in DoublePolePosition::ALL {
            for pole in 1..=DOUBLE_POLES_PER_POSITION {
                locations.push(double_pole_location(zone, position, pole));
            }
        }
    }

    locations
}

/// All locations of one structure type
pub fn locations_by_type(structure_type: StructureType) -> Vec<FarmLocation> {
    generate_catalog()
        .into_iter()
        .filter(|l| l.structure_type == structure_type)
        .collect()
}

/// All locations in one zone
pub fn locations_by_zone(zone: Zone) -> Vec<FarmLocation> {
    generate_catalog()
        .into_iter()
        .filter(|l| l.zone == zone)
        .collect()
}

/// Look up a location by identifier.
///
/// Returns `None` for identifiers the current catalog does not define; old
/// entries may reference locations whose definition has since changed.
pub fn find_location(id: &str) -> Option<FarmLocation> {
    let mut chars = id.chars();
    let zone = Zone::from_letter(chars.next()?)?;
    let rest = chars.as_str();

    if let Some(tail) = rest.strip_prefix("DP") {
        let mut tail_chars = tail.chars();
        let position = DoublePolePosition::from_letter(tail_chars.next()?)?;
        let pole = parse_ordinal(tail_chars.as_str(), DOUBLE_POLES_PER_POSITION)?;
        return Some(double_pole_location(zone, position, pole));
    }

    if let Some(tail) = rest.strip_prefix('T') {
        let (number, letter) = split_last_char(tail)?;
        let trellis = parse_ordinal(number, TRELLISES_PER_ZONE)?;
        letter_ordinal(letter, SECTIONS_PER_TRELLIS)?;
        return Some(trellis_location(zone, trellis, letter));
    }

    // Greenhouse: one digit each for greenhouse and row, then the pole letter
    let bytes = rest.as_bytes();
    if bytes.len() != 3 || !rest.is_ascii() {
        return None;
    }
    let greenhouse = parse_ordinal(&rest[0..1], GREENHOUSES_PER_ZONE)?;
    let row = parse_ordinal(&rest[1..2], ROWS_PER_GREENHOUSE)?;
    let pole = char::from(bytes[2]);
    letter_ordinal(pole, POLES_PER_ROW)?;
    Some(greenhouse_location(zone, greenhouse, row, pole))
}

/// Human-readable name for a location id, falling back to the raw id
pub fn location_display_name(id: &str) -> String {
    find_location(id)
        .map(|l| l.name)
        .unwrap_or_else(|| id.to_string())
}

fn greenhouse_location(zone: Zone, greenhouse: u32, row: u32, pole: char) -> FarmLocation {
    FarmLocation {
        id: format!("{}{}{}{}", zone.letter(), greenhouse, row, pole),
        structure_type: StructureType::Greenhouse,
        zone,
        name: format!("{} Greenhouse {} Row {} Pole {}", zone, greenhouse, row, pole),
    }
}

fn trellis_location(zone: Zone, trellis: u32, section: char) -> FarmLocation {
    FarmLocation {
        id: format!("{}T{}{}", zone.letter(), trellis, section),
        structure_type: StructureType::Trellis,
        zone,
        name: format!("{} Trellis {} Section {}", zone, trellis, section),
    }
}

fn double_pole_location(zone: Zone, position: DoublePolePosition, pole: u32) -> FarmLocation {
    FarmLocation {
        id: format!("{}DP{}{}", zone.letter(), position.letter(), pole),
        structure_type: StructureType::DoublePole,
        zone,
        name: format!("{} Double Pole {} {}", zone, position.label(), pole),
    }
}

/// 0 -> 'A', 1 -> 'B', ...
fn ordinal_letter(index: u32) -> char {
    char::from(b'A' + index as u8)
}

fn letter_ordinal(letter: char, count: u32) -> Option<u32> {
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let index = letter as u32 - 'A' as u32;
    (index < count).then_some(index)
}

/// Parse a 1-based number in `1..=max`, rejecting signs and leading zeros
fn parse_ordinal(s: &str, max: u32) -> Option<u32> {
    if s.is_empty() || s.starts_with('0') || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: u32 = s.parse().ok()?;
    (1..=max).contains(&n).then_some(n)
}

fn split_last_char(s: &str) -> Option<(&str, char)> {
    let last = s.chars().last()?;
    Some((&s[..s.len() - last.len_utf8()], last))
}

//! Themed keyword lists
//!
//! Each issuance draws a permutation of `1..=10`. The first three values pick
//! from `ELEMENTS`, the next three from `CREATURES` (value `v` → index `v - 1`).

use crate::issuance::IssuanceError;

/// Number of entries in each list (also the draw's `max`)
pub const LIST_LEN: usize = 10;

/// Keywords picked per list
pub const PICKS_PER_LIST: usize = 3;

pub const ELEMENTS: [&str; LIST_LEN] = [
    "Ember", "Tide", "Gale", "Stone", "Frost", "Bloom", "Spark", "Shade", "Dawn", "Dusk",
];

pub const CREATURES: [&str; LIST_LEN] = [
    "Fox", "Heron", "Wolf", "Owl", "Stag", "Hare", "Raven", "Lynx", "Otter", "Crane",
];

/// Keyword for a drawn value in `[1, LIST_LEN]`
pub fn keyword(list: &[&'static str; LIST_LEN], value: u64) -> Result<&'static str, IssuanceError> {
    if value == 0 || value > LIST_LEN as u64 {
        return Err(IssuanceError::KeywordOutOfRange(value));
    }
    Ok(list[(value - 1) as usize])
}

/// Map the first six drawn values onto the two lists
pub fn select(values: &[u64]) -> Result<([String; 3], [String; 3]), IssuanceError> {
    let needed = PICKS_PER_LIST * 2;
    if values.len() < needed {
        return Err(IssuanceError::InsufficientDraw {
            needed,
            got: values.len(),
        });
    }

    let pick = |list: &[&'static str; LIST_LEN], offset: usize| -> Result<[String; 3], IssuanceError> {
        Ok([
            keyword(list, values[offset])?.to_string(),
            keyword(list, values[offset + 1])?.to_string(),
            keyword(list, values[offset + 2])?.to_string(),
        ])
    };

    Ok((pick(&ELEMENTS, 0)?, pick(&CREATURES, PICKS_PER_LIST)?))
}

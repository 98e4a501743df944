//! Country/region classification
//!
//! Splits the distinct entity names of a dataset into countries (present in
//! the roster) and regions (everything else: continents, income groups,
//! the world aggregate).

use crate::types::EntityRoster;
use std::collections::BTreeSet;

/// A total, disjoint partition of entity names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub countries: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

/// Partition `entities` by exact membership in `roster`.
///
/// Matching is case- and whitespace-sensitive. An empty roster (e.g. the
/// roster fetch failed) puts every entity in `regions`.
pub fn classify<'a, I>(entities: I, roster: &EntityRoster) -> Classification
where
    I: IntoIterator<Item = &'a String>,
{
    let mut classification = Classification::default();
    for entity in entities {
        if roster.contains(entity) {
            classification.countries.insert(entity.clone());
        } else {
            classification.regions.insert(entity.clone());
        }
    }
    classification
}

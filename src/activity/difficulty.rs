use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Read from config as its name (`"Easy"`), since layered RON merging drops enum variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DifficultyRating {
    #[default]
    Beginner,
    Easy,
    Normal,
    Hard,
    VeryHard,
    Expert,
    Master,
    Insane,
    Nightmare,
    Impossible,
}

impl DifficultyRating {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl FromStr for DifficultyRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use DifficultyRating::*;
        [
            Beginner, Easy, Normal, Hard, VeryHard, Expert, Master, Insane, Nightmare, Impossible,
        ]
        .into_iter()
        .find(|r| r.to_string().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown difficulty rating '{s}'"))
    }
}

impl TryFrom<String> for DifficultyRating {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DifficultyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Read-only knobs handed from the activity controller to its parts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DifficultyContext {
    pub rating: DifficultyRating,
    /// Collectible objects per counting part.
    pub object_count: usize,
    /// Level from which this entry applies.
    pub completed_levels_threshold: u32,
}

impl Default for DifficultyContext {
    fn default() -> Self {
        Self {
            rating: DifficultyRating::Beginner,
            object_count: 10,
            completed_levels_threshold: 0,
        }
    }
}

/// Difficulty entries indexed by unlock level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DifficultyTable {
    entries: Vec<DifficultyContext>,
}

impl DifficultyTable {
    pub fn new(entries: Vec<DifficultyContext>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose threshold is the closest one not above `level`.
    ///
    /// Falls back to the last entry when the level is below every threshold.
    pub fn select(&self, level: u32) -> Option<DifficultyContext> {
        let Some(last) = self.entries.last() else {
            error!(target: "activity", "no difficulty settings found");
            return None;
        };
        let best = self
            .entries
            .iter()
            .filter(|d| level >= d.completed_levels_threshold)
            .min_by_key(|d| level - d.completed_levels_threshold);
        match best {
            Some(d) => Some(*d),
            None => {
                error!(
                    target: "activity",
                    "difficulty settings not found for level {level}; using last entry"
                );
                Some(*last)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rating: DifficultyRating, threshold: u32, count: usize) -> DifficultyContext {
        DifficultyContext {
            rating,
            object_count: count,
            completed_levels_threshold: threshold,
        }
    }

    #[test]
    fn picks_closest_unlocked_threshold() {
        let table = DifficultyTable::new(vec![
            entry(DifficultyRating::Beginner, 1, 3),
            entry(DifficultyRating::Easy, 3, 5),
            entry(DifficultyRating::Normal, 6, 8),
        ]);
        assert_eq!(table.select(1).unwrap().object_count, 3);
        assert_eq!(table.select(4).unwrap().rating, DifficultyRating::Easy);
        assert_eq!(table.select(40).unwrap().rating, DifficultyRating::Normal);
        // below every threshold: last entry
        assert_eq!(table.select(0).unwrap().rating, DifficultyRating::Normal);
    }

    #[test]
    fn rating_parses_from_name() {
        assert_eq!("VeryHard".parse(), Ok(DifficultyRating::VeryHard));
        assert_eq!(" easy ".parse(), Ok(DifficultyRating::Easy));
        assert!("Legendary".parse::<DifficultyRating>().is_err());
    }

    #[test]
    fn empty_table_yields_none() {
        assert!(DifficultyTable::default().select(1).is_none());
    }
}

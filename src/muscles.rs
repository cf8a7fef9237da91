//! Muscle group definitions and the fixed orders the rotation depends on

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Muscle groups tracked by the rotation.
///
/// Declaration order is the canonical key order: it drives serialization
/// and every "first wins" tie-break.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Muscle {
    Shoulders,
    Chest,
    Back,
    Legs,
    Biceps,
    Triceps,
    Core,
}

/// Main groups in recommendation order. Ties on days-since go to the earliest entry.
pub const MAIN_ROTATION: [Muscle; 4] = [Muscle::Shoulders, Muscle::Chest, Muscle::Back, Muscle::Legs];

/// Main groups in the order they are offered for logging
pub const MAIN_GROUPS: [Muscle; 4] = [Muscle::Chest, Muscle::Back, Muscle::Shoulders, Muscle::Legs];

/// Superset candidates that are always eligible, in pool construction order
pub const ACCESSORY_POOL: [Muscle; 3] = [Muscle::Biceps, Muscle::Triceps, Muscle::Core];

/// Major groups eligible as supersets unless they are the main muscle
pub const MAJOR_POOL: [Muscle; 3] = [Muscle::Chest, Muscle::Back, Muscle::Shoulders];

/// Superset picker categories
pub const SUPERSET_CATEGORIES: [(&str, &[Muscle]); 3] = [
    ("Major Muscle Groups", &[Muscle::Chest, Muscle::Back, Muscle::Shoulders]),
    ("Arms", &[Muscle::Biceps, Muscle::Triceps]),
    ("Core", &[Muscle::Core]),
];

impl Muscle {
    /// All muscle groups in canonical order
    pub const ALL: [Muscle; 7] = [
        Muscle::Shoulders,
        Muscle::Chest,
        Muscle::Back,
        Muscle::Legs,
        Muscle::Biceps,
        Muscle::Triceps,
        Muscle::Core,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Muscle::Shoulders => "shoulders",
            Muscle::Chest => "chest",
            Muscle::Back => "back",
            Muscle::Legs => "legs",
            Muscle::Biceps => "biceps",
            Muscle::Triceps => "triceps",
            Muscle::Core => "core",
        }
    }

    /// Capitalized name for headings and buttons
    pub fn label(&self) -> &'static str {
        match self {
            Muscle::Shoulders => "Shoulders",
            Muscle::Chest => "Chest",
            Muscle::Back => "Back",
            Muscle::Legs => "Legs",
            Muscle::Biceps => "Biceps",
            Muscle::Triceps => "Triceps",
            Muscle::Core => "Core",
        }
    }

    /// Whether this group can be the main muscle of a session
    pub fn is_main(&self) -> bool {
        MAIN_ROTATION.contains(self)
    }
}

impl fmt::Display for Muscle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown muscle group: {0}")]
pub struct UnknownMuscle(pub String);

impl FromStr for Muscle {
    type Err = UnknownMuscle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Muscle::ALL
            .iter()
            .find(|m| m.name() == wanted)
            .copied()
            .ok_or_else(|| UnknownMuscle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Chest".parse::<Muscle>().unwrap(), Muscle::Chest);
        assert_eq!(" core ".parse::<Muscle>().unwrap(), Muscle::Core);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "glutes".parse::<Muscle>().unwrap_err();
        assert_eq!(err, UnknownMuscle("glutes".to_string()));
    }

    #[test]
    fn test_name_roundtrip() {
        for muscle in Muscle::ALL {
            assert_eq!(muscle.name().parse::<Muscle>().unwrap(), muscle);
        }
    }

    #[test]
    fn test_main_groups() {
        assert!(Muscle::Legs.is_main());
        assert!(Muscle::Shoulders.is_main());
        assert!(!Muscle::Biceps.is_main());
        assert!(!Muscle::Core.is_main());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Muscle::Triceps).unwrap();
        assert_eq!(json, "\"triceps\"");
        let back: Muscle = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(back, Muscle::Back);
    }

    #[test]
    fn test_categories_cover_superset_pool() {
        let mut covered: Vec<Muscle> = SUPERSET_CATEGORIES
            .iter()
            .flat_map(|(_, muscles)| muscles.iter().copied())
            .collect();
        covered.sort();
        let mut pool: Vec<Muscle> = ACCESSORY_POOL.iter().chain(MAJOR_POOL.iter()).copied().collect();
        pool.sort();
        assert_eq!(covered, pool);
    }
}

//! Session logger - commits a workout and builds the superset selection

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::history::{MuscleHistory, SupersetLog, SupersetRecord};
use crate::muscles::{Muscle, SUPERSET_CATEGORIES, UnknownMuscle};

/// One press in the superset picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Explicit "no supersets today"
    None,
    Muscle(Muscle),
}

impl FromStr for Pick {
    type Err = UnknownMuscle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("none") {
            return Ok(Pick::None);
        }
        s.parse().map(Pick::Muscle)
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::None => f.write_str("none"),
            Pick::Muscle(m) => m.fmt(f),
        }
    }
}

/// Superset picker state.
///
/// `Empty` and `NoneSelected` both log no supersets but stay separate
/// states: "none" is exclusive while it is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SupersetSelection {
    #[default]
    Empty,
    NoneSelected,
    /// Selected muscles in pick order
    Partial(Vec<Muscle>),
}

impl SupersetSelection {
    /// Apply one picker press
    pub fn pick(&mut self, pick: Pick) {
        let next = match (std::mem::take(self), pick) {
            (_, Pick::None) => SupersetSelection::NoneSelected,
            (SupersetSelection::Empty | SupersetSelection::NoneSelected, Pick::Muscle(m)) => {
                SupersetSelection::Partial(vec![m])
            }
            (SupersetSelection::Partial(mut muscles), Pick::Muscle(m)) => {
                if let Some(pos) = muscles.iter().position(|x| *x == m) {
                    muscles.remove(pos);
                } else {
                    muscles.push(m);
                }
                if muscles.is_empty() {
                    SupersetSelection::Empty
                } else {
                    SupersetSelection::Partial(muscles)
                }
            }
        };
        *self = next;
    }

    /// Build a selection from a complete list of picks.
    ///
    /// Any `none` wins; repeated muscles are kept once.
    pub fn from_picks<I>(picks: I) -> Self
    where
        I: IntoIterator<Item = Pick>,
    {
        let mut muscles: Vec<Muscle> = Vec::new();
        for pick in picks {
            match pick {
                Pick::None => return SupersetSelection::NoneSelected,
                Pick::Muscle(m) => {
                    if !muscles.contains(&m) {
                        muscles.push(m);
                    }
                }
            }
        }

        if muscles.is_empty() {
            SupersetSelection::Empty
        } else {
            SupersetSelection::Partial(muscles)
        }
    }

    pub fn is_selected(&self, muscle: Muscle) -> bool {
        matches!(self, SupersetSelection::Partial(muscles) if muscles.contains(&muscle))
    }

    /// Muscles that will be logged as supersets
    pub fn muscles(&self) -> &[Muscle] {
        match self {
            SupersetSelection::Partial(muscles) => muscles,
            SupersetSelection::Empty | SupersetSelection::NoneSelected => &[],
        }
    }
}

/// Picker categories for a session, without the main muscle
pub fn superset_options(main: Muscle) -> Vec<(&'static str, Vec<Muscle>)> {
    SUPERSET_CATEGORIES
        .iter()
        .map(|(name, muscles)| (*name, muscles.iter().copied().filter(|m| *m != main).collect::<Vec<_>>()))
        .filter(|(_, muscles)| !muscles.is_empty())
        .collect()
}

/// Record a workout at `now`.
///
/// The main muscle always gets `now`. A non-empty muscle selection also
/// stamps every superset muscle with the same instant and appends one
/// record, which is returned.
pub fn log_workout(
    history: &mut MuscleHistory,
    log: &mut SupersetLog,
    main: Muscle,
    selection: &SupersetSelection,
    now: DateTime<Utc>,
) -> Option<SupersetRecord> {
    history.mark_trained(main, now);

    let muscles = selection.muscles();
    if muscles.is_empty() {
        return None;
    }

    for muscle in muscles {
        history.mark_trained(*muscle, now);
    }

    let record = SupersetRecord {
        timestamp: now,
        main_muscle: main,
        superset_muscles: muscles.to_vec(),
    };
    log.push(record.clone());
    Some(record)
}

//! Recommendation engine based on how long each muscle has rested

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{DaysSince, days_since};
use crate::history::MuscleHistory;
use crate::muscles::{ACCESSORY_POOL, MAIN_ROTATION, MAJOR_POOL, Muscle};

/// What to train next, with the recency behind each pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub main: Muscle,
    pub main_days: DaysSince,
    pub supersets: [(Muscle, DaysSince); 2],
}

impl Recommendation {
    pub fn superset_muscles(&self) -> [Muscle; 2] {
        [self.supersets[0].0, self.supersets[1].0]
    }
}

/// One row of the history view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleStatus {
    pub muscle: Muscle,
    pub last_trained: Option<DateTime<Utc>>,
    pub days: DaysSince,
}

/// Main group that has rested the longest.
///
/// Scans [`MAIN_ROTATION`] in order and only replaces the current pick on a
/// strictly larger value, so ties go to the earlier muscle.
pub fn recommend_main(history: &MuscleHistory, now: DateTime<Utc>) -> Muscle {
    let mut best = MAIN_ROTATION[0];
    let mut best_days = days_since(history.last_trained(best), now);

    for muscle in &MAIN_ROTATION[1..] {
        let days = days_since(history.last_trained(*muscle), now);
        if days > best_days {
            best = *muscle;
            best_days = days;
        }
    }

    best
}

/// Two longest rested superset partners for `main`.
///
/// Candidates are the accessory groups followed by the major groups other
/// than `main`. The sort is stable, so ties keep that construction order.
pub fn recommend_supersets(main: Muscle, history: &MuscleHistory, now: DateTime<Utc>) -> [Muscle; 2] {
    let ranked = rank_superset_candidates(main, history, now);
    [ranked[0].0, ranked[1].0]
}

fn rank_superset_candidates(main: Muscle, history: &MuscleHistory, now: DateTime<Utc>) -> Vec<(Muscle, DaysSince)> {
    let mut candidates: Vec<(Muscle, DaysSince)> = ACCESSORY_POOL
        .iter()
        .chain(MAJOR_POOL.iter().filter(|m| **m != main))
        .map(|m| (*m, days_since(history.last_trained(*m), now)))
        .collect();

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates
}

/// Main muscle and superset partners in one go
pub fn recommend(history: &MuscleHistory, now: DateTime<Utc>) -> Recommendation {
    let main = recommend_main(history, now);
    let ranked = rank_superset_candidates(main, history, now);
    let recommendation = Recommendation {
        main,
        main_days: days_since(history.last_trained(main), now),
        supersets: [ranked[0], ranked[1]],
    };

    debug!(
        "Recommended {} with {} + {}",
        recommendation.main, recommendation.supersets[0].0, recommendation.supersets[1].0
    );
    recommendation
}

/// Every muscle in canonical order with its recency
pub fn muscle_report(history: &MuscleHistory, now: DateTime<Utc>) -> Vec<MuscleStatus> {
    history
        .iter()
        .map(|(muscle, last_trained)| MuscleStatus {
            muscle,
            last_trained,
            days: days_since(last_trained, now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn history_with(entries: &[(Muscle, i64)]) -> MuscleHistory {
        let mut history = MuscleHistory::new();
        for (muscle, days) in entries {
            history.mark_trained(*muscle, days_ago(*days));
        }
        history
    }

    #[test]
    fn test_empty_history_picks_first_in_rotation() {
        let history = MuscleHistory::new();
        assert_eq!(recommend_main(&history, now()), Muscle::Shoulders);
    }

    #[test]
    fn test_never_trained_wins() {
        let history = history_with(&[(Muscle::Chest, 10), (Muscle::Back, 3), (Muscle::Legs, 1)]);
        assert_eq!(recommend_main(&history, now()), Muscle::Shoulders);
    }

    #[test]
    fn test_longest_rest_wins() {
        let history = history_with(&[
            (Muscle::Shoulders, 2),
            (Muscle::Chest, 5),
            (Muscle::Back, 9),
            (Muscle::Legs, 4),
        ]);
        assert_eq!(recommend_main(&history, now()), Muscle::Back);
    }

    #[test]
    fn test_tie_goes_to_earlier_rotation_entry() {
        let history = history_with(&[
            (Muscle::Shoulders, 1),
            (Muscle::Chest, 6),
            (Muscle::Back, 2),
            (Muscle::Legs, 6),
        ]);
        assert_eq!(recommend_main(&history, now()), Muscle::Chest);

        let history = history_with(&[(Muscle::Shoulders, 1), (Muscle::Chest, 2)]);
        assert_eq!(recommend_main(&history, now()), Muscle::Back);
    }

    #[test]
    fn test_accessories_never_become_main() {
        let history = history_with(&[
            (Muscle::Shoulders, 1),
            (Muscle::Chest, 1),
            (Muscle::Back, 1),
            (Muscle::Legs, 1),
        ]);
        assert!(recommend_main(&history, now()).is_main());
    }

    #[test]
    fn test_supersets_empty_history_keep_pool_order() {
        let history = MuscleHistory::new();
        assert_eq!(
            recommend_supersets(Muscle::Chest, &history, now()),
            [Muscle::Biceps, Muscle::Triceps]
        );
    }

    #[test]
    fn test_supersets_prefer_longest_rest() {
        let history = history_with(&[
            (Muscle::Biceps, 1),
            (Muscle::Triceps, 2),
            (Muscle::Core, 3),
            (Muscle::Back, 8),
            (Muscle::Shoulders, 5),
        ]);
        assert_eq!(
            recommend_supersets(Muscle::Chest, &history, now()),
            [Muscle::Back, Muscle::Shoulders]
        );
    }

    #[test]
    fn test_supersets_tie_keeps_construction_order() {
        let history = history_with(&[
            (Muscle::Biceps, 1),
            (Muscle::Triceps, 1),
            (Muscle::Core, 4),
            (Muscle::Chest, 4),
            (Muscle::Back, 4),
            (Muscle::Shoulders, 1),
        ]);
        assert_eq!(
            recommend_supersets(Muscle::Shoulders, &history, now()),
            [Muscle::Core, Muscle::Chest]
        );
    }

    #[test]
    fn test_supersets_exclude_main_and_are_distinct() {
        let history = history_with(&[(Muscle::Biceps, 2), (Muscle::Core, 7), (Muscle::Chest, 1)]);
        for main in MAIN_ROTATION {
            let picks = recommend_supersets(main, &history, now());
            assert_ne!(picks[0], picks[1]);
            assert!(!picks.contains(&main));
            for pick in picks {
                assert!(ACCESSORY_POOL.contains(&pick) || MAJOR_POOL.contains(&pick));
            }
        }
    }

    #[test]
    fn test_legs_keeps_all_major_groups_in_pool() {
        let history = history_with(&[
            (Muscle::Biceps, 1),
            (Muscle::Triceps, 1),
            (Muscle::Core, 1),
            (Muscle::Chest, 2),
            (Muscle::Back, 9),
            (Muscle::Shoulders, 9),
        ]);
        assert_eq!(
            recommend_supersets(Muscle::Legs, &history, now()),
            [Muscle::Back, Muscle::Shoulders]
        );
    }

    #[test]
    fn test_recommend_bundles_days() {
        let history = history_with(&[(Muscle::Chest, 10), (Muscle::Back, 3), (Muscle::Legs, 1)]);
        let rec = recommend(&history, now());
        assert_eq!(rec.main, Muscle::Shoulders);
        assert_eq!(rec.main_days, DaysSince::Never);
        assert_eq!(rec.superset_muscles(), [Muscle::Biceps, Muscle::Triceps]);
        assert_eq!(rec.supersets[0].1, DaysSince::Never);
    }

    #[test]
    fn test_muscle_report_covers_everything() {
        let history = history_with(&[(Muscle::Core, 2)]);
        let report = muscle_report(&history, now());
        assert_eq!(report.len(), Muscle::ALL.len());
        assert_eq!(report[0].muscle, Muscle::Shoulders);

        let core = report.iter().find(|s| s.muscle == Muscle::Core).unwrap();
        assert_eq!(core.days, DaysSince::Days(2));
        assert_eq!(core.last_trained, Some(days_ago(2)));
    }
}

//! Progress summary for one piece of equipment.
//!
//! All figures are reductions over the sets already loaded with the
//! exercises; nothing here touches the database.

use chrono::SecondsFormat;
use serde::Serialize;

use super::ExerciseWithSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub equipment_id: i64,
    pub exercises: Vec<ExerciseWithSession>,
    pub max_weight: f64,
    pub total_volume: f64,
    /// RFC 3339 date of the most recent session, empty when nothing was logged.
    pub last_workout: String,
}

pub fn summarize(equipment_id: i64, exercises: Vec<ExerciseWithSession>) -> Progress {
    let sets = || exercises.iter().flat_map(|e| e.sets.iter());

    let max_weight = sets().map(|set| set.weight).fold(0.0, f64::max);
    let total_volume = sets().map(|set| set.volume()).sum();

    let last_workout = exercises
        .iter()
        .map(|e| e.workout_session.date)
        .max()
        .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();

    Progress {
        equipment_id,
        exercises,
        max_weight,
        total_volume,
        last_workout,
    }
}

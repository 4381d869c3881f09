use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{Equipment, FromSqliteRow, WorkoutSession};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_session_id: i64,
    pub equipment_id: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_session_id: row.get("workout_session_id")?,
            equipment_id: row.get("equipment_id")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// One logged set within a workout exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_exercise_id: i64,
    pub set_number: i32,
    pub reps: i32,
    pub weight: f64,
}

impl WorkoutSet {
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }
}

impl FromSqliteRow for WorkoutSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_exercise_id: row.get("workout_exercise_id")?,
            set_number: row.get("set_number")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseWithSets {
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub sets: Vec<WorkoutSet>,
}

/// Exercise as listed inside a workout session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithEquipment {
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub equipment: Equipment,
    pub sets: Vec<WorkoutSet>,
}

/// Exercise as listed in the progress of one piece of equipment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithSession {
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub sets: Vec<WorkoutSet>,
    pub workout_session: WorkoutSession,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSet {
    pub reps: i32,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutExercise {
    pub equipment_id: Option<i64>,
    pub workout_session_id: Option<i64>,
    #[serde(default)]
    pub sets: Vec<NewSet>,
    pub notes: Option<String>,
}

impl CreateWorkoutExercise {
    /// Returns `(equipment_id, workout_session_id)` when the body is complete.
    pub fn validate(&self) -> Result<(i64, i64), String> {
        let (Some(equipment_id), Some(session_id)) = (self.equipment_id, self.workout_session_id)
        else {
            return Err("Equipment id and workout session id are required".to_string());
        };

        if self.sets.is_empty() {
            return Err("Sets is required".to_string());
        }

        for (i, set) in self.sets.iter().enumerate() {
            if set.reps <= 0 {
                return Err(format!("Set {} must have at least one rep", i + 1));
            }
            if !set.weight.is_finite() || set.weight < 0.0 {
                return Err(format!("Set {} has an invalid weight", i + 1));
            }
        }

        Ok((equipment_id, session_id))
    }
}

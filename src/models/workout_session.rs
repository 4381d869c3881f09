use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::workout_exercise::ExerciseWithEquipment;
use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub workout_exercises: Vec<ExerciseWithEquipment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutSession {
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl CreateWorkoutSession {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err("End time must not be before start time".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndWorkoutSession {
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_session_parses_camel_case() {
        let body: CreateWorkoutSession = serde_json::from_str(
            r#"{"date":"2024-03-01T10:00:00Z","startTime":"2024-03-01T10:00:00Z","notes":"legs"}"#,
        )
        .unwrap();

        assert!(body.date.is_some());
        assert!(body.start_time.is_some());
        assert!(body.end_time.is_none());
        assert_eq!(body.notes.as_deref(), Some("legs"));
    }

    #[test]
    fn test_create_session_rejects_end_before_start() {
        let start = Utc::now();
        let body = CreateWorkoutSession {
            start_time: Some(start),
            end_time: Some(start - Duration::minutes(5)),
            ..Default::default()
        };
        assert!(body.validate().is_err());
    }
}

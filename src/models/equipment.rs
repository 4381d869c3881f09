use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentType {
    Cardio,
    Strength,
    FreeWeights,
    Machine,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 4] = [
        EquipmentType::Cardio,
        EquipmentType::Strength,
        EquipmentType::FreeWeights,
        EquipmentType::Machine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Cardio => "cardio",
            EquipmentType::Strength => "strength",
            EquipmentType::FreeWeights => "free-weights",
            EquipmentType::Machine => "machine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl ToSql for EquipmentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EquipmentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        EquipmentType::parse(s).ok_or(FromSqlError::InvalidType)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromSqliteRow for Equipment {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            kind: row.get("type")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetMuscle {
    pub id: i64,
    pub equipment_id: i64,
    pub muscle: String,
}

impl FromSqliteRow for TargetMuscle {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            equipment_id: row.get("equipment_id")?,
            muscle: row.get("muscle")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentWithMuscles {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub target_muscles: Vec<TargetMuscle>,
}

/// Request body shared by create and update.
#[derive(Debug, Deserialize)]
pub struct EquipmentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub muscles: Option<Vec<String>>,
}

/// An [`EquipmentForm`] that passed validation.
#[derive(Debug, Clone)]
pub struct ValidEquipment {
    pub name: String,
    pub kind: EquipmentType,
    pub description: Option<String>,
    pub muscles: Option<Vec<String>>,
}

impl EquipmentForm {
    pub fn validate(self) -> Result<ValidEquipment, String> {
        let name = self.name.trim();
        if name.is_empty() || self.kind.trim().is_empty() {
            return Err("Name and type are required".to_string());
        }

        let kind = EquipmentType::parse(self.kind.trim()).ok_or_else(|| {
            format!(
                "Unknown equipment type '{}', expected one of: cardio, strength, free-weights, machine",
                self.kind
            )
        })?;

        let muscles = self.muscles.map(|muscles| {
            muscles
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect()
        });

        Ok(ValidEquipment {
            name: name.to_string(),
            kind,
            description: self.description.filter(|d| !d.trim().is_empty()),
            muscles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, kind: &str, muscles: Option<Vec<&str>>) -> EquipmentForm {
        EquipmentForm {
            name: name.to_string(),
            kind: kind.to_string(),
            description: None,
            muscles: muscles.map(|m| m.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_equipment_type_round_trip() {
        for kind in EquipmentType::ALL {
            assert_eq!(EquipmentType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EquipmentType::parse("yoga"), None);
    }

    #[test]
    fn test_equipment_type_serializes_kebab_case() {
        let json = serde_json::to_string(&EquipmentType::FreeWeights).unwrap();
        assert_eq!(json, "\"free-weights\"");
    }

    #[test]
    fn test_validate_requires_name_and_type() {
        assert!(form("", "machine", None).validate().is_err());
        assert!(form("Leg Press", "", None).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let err = form("Leg Press", "yoga", None).validate().unwrap_err();
        assert!(err.contains("yoga"));
    }

    #[test]
    fn test_validate_cleans_muscles() {
        let valid = form(" Leg Press ", "machine", Some(vec!["quads", " ", " glutes "]))
            .validate()
            .unwrap();

        assert_eq!(valid.name, "Leg Press");
        assert_eq!(valid.kind, EquipmentType::Machine);
        assert_eq!(
            valid.muscles,
            Some(vec!["quads".to_string(), "glutes".to_string()])
        );
    }
}

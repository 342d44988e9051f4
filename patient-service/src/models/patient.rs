use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptive fields of a patient, everything except the identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientDetails {
    pub firstname: String,
    /// Family name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Stored patient document. The identifier maps to the collection's `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub details: PatientDetails,
}

impl Patient {
    /// A new record with a freshly generated identifier.
    pub fn new(details: PatientDetails) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), details)
    }

    pub fn with_id(id: impl Into<String>, details: PatientDetails) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }
}

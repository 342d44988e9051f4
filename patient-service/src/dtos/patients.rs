use crate::models::{Patient, PatientDetails};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Body of `POST /patientBack/add` and `POST /patientBack/update/{id}`.
///
/// Every field deserializes leniently so that missing or malformed values
/// are reported per field by [`PatientRequest::into_details`]. An `id` in the
/// body is ignored; identity comes from the store or the path.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatientRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub firstname: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// ISO `YYYY-MM-DD`, parsed in `into_details`.
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    #[validate(length(max = 16, message = "Gender must be at most 16 characters"))]
    pub gender: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

impl PatientRequest {
    /// Trim every field, drop blank optionals, then check the result.
    pub fn into_details(self) -> Result<PatientDetails, AppError> {
        let request = Self {
            firstname: self.firstname.trim().to_string(),
            name: self.name.trim().to_string(),
            birthdate: non_blank(self.birthdate),
            gender: non_blank(self.gender),
            address: non_blank(self.address),
            phone: non_blank(self.phone),
        };

        let mut errors = match request.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let birthdate = match request
            .birthdate
            .as_deref()
            .map(parse_birthdate)
            .transpose()
        {
            Ok(date) => date,
            Err(error) => {
                errors.add("birthdate", error);
                None
            }
        };

        if !errors.errors().is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        Ok(PatientDetails {
            firstname: request.firstname,
            name: request.name,
            birthdate,
            gender: request.gender,
            address: request.address,
            phone: request.phone,
        })
    }
}

fn parse_birthdate(raw: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ValidationError::new("date_format")
            .with_message(Cow::Borrowed("Birthdate must be formatted YYYY-MM-DD"))
    })?;

    if date > Utc::now().date_naive() {
        return Err(ValidationError::new("future_date")
            .with_message(Cow::Borrowed("Birthdate cannot be in the future")));
    }

    Ok(date)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientResponse {
    pub id: String,
    #[serde(flatten)]
    pub details: PatientDetails,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            details: patient.details,
        }
    }
}

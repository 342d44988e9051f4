use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Patient as exchanged with the patient service and handed to the views.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub firstname: String,
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

// Accessors for templates, which render absent values as empty inputs.
impl Patient {
    pub fn id_value(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn birthdate_value(&self) -> String {
        self.birthdate
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn gender_value(&self) -> &str {
        self.gender.as_deref().unwrap_or_default()
    }

    pub fn address_value(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }

    pub fn phone_value(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }
}

/// Browser form submission. Every input arrives as text, possibly empty.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatientForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub firstname: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub birthdate: String,
    #[serde(default)]
    #[validate(length(max = 16, message = "Gender must be at most 16 characters"))]
    pub gender: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: String,
}

impl PatientForm {
    /// Check the submitted fields and build the record to send upstream.
    /// Runs before every create and update.
    pub fn into_patient(self) -> Result<Patient, AppError> {
        let form = Self {
            firstname: self.firstname.trim().to_string(),
            name: self.name.trim().to_string(),
            birthdate: self.birthdate.trim().to_string(),
            gender: self.gender.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };

        let mut errors = match form.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let birthdate = match parse_birthdate(&form.birthdate) {
            Ok(date) => date,
            Err(error) => {
                errors.add("birthdate", error);
                None
            }
        };

        if !errors.errors().is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        Ok(Patient {
            id: None,
            firstname: form.firstname,
            name: form.name,
            birthdate,
            gender: non_empty(form.gender),
            address: non_empty(form.address),
            phone: non_empty(form.phone),
        })
    }
}

fn parse_birthdate(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ValidationError::new("date_format")
            .with_message(Cow::Borrowed("Birthdate must be formatted YYYY-MM-DD"))
    })?;

    if date > Utc::now().date_naive() {
        return Err(ValidationError::new("future_date")
            .with_message(Cow::Borrowed("Birthdate cannot be in the future")));
    }

    Ok(Some(date))
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

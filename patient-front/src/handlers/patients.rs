use crate::models::{Patient, PatientForm};
use crate::services::Forwarded;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use service_core::error::AppError;
use service_core::extract::RecordId;

#[derive(Template)]
#[template(path = "patient/list.html")]
pub struct PatientListTemplate {
    pub patients: Vec<Patient>,
    pub base_url: String,
}

#[derive(Template)]
#[template(path = "patient/update.html")]
pub struct PatientUpdateTemplate {
    pub patient: Patient,
    pub base_url: String,
}

#[derive(Template)]
#[template(path = "patient/add.html")]
pub struct PatientAddTemplate {
    pub patient: Patient,
    pub base_url: String,
}

pub async fn list_patients(
    State(state): State<AppState>,
    fwd: Forwarded,
) -> Result<impl IntoResponse, AppError> {
    let patients = state.patient_client.list(&fwd).await?;

    Ok(PatientListTemplate {
        patients,
        base_url: state.patient_client.base_url().to_string(),
    })
}

pub async fn update_patient_form(
    State(state): State<AppState>,
    id: RecordId,
    fwd: Forwarded,
) -> Result<impl IntoResponse, AppError> {
    let mut patient = state.patient_client.get(&id, &fwd).await?;
    patient.id = Some(id.into_inner());

    Ok(PatientUpdateTemplate {
        patient,
        base_url: state.patient_client.base_url().to_string(),
    })
}

pub async fn update_patient(
    State(state): State<AppState>,
    id: RecordId,
    fwd: Forwarded,
    Form(form): Form<PatientForm>,
) -> Result<impl IntoResponse, AppError> {
    let mut patient = form.into_patient()?;
    patient.id = Some(id.to_string());

    state.patient_client.update(&id, &patient, &fwd).await?;

    Ok(Redirect::to(&state.patient_client.list_page_url()))
}

/// Blank form; needs no Authorization since nothing goes upstream.
pub async fn add_patient_form(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("Rendering add patient form");

    PatientAddTemplate {
        patient: Patient::default(),
        base_url: state.patient_client.base_url().to_string(),
    }
}

pub async fn add_patient(
    State(state): State<AppState>,
    fwd: Forwarded,
    Form(form): Form<PatientForm>,
) -> Result<impl IntoResponse, AppError> {
    let patient = form.into_patient()?;

    state.patient_client.add(&patient, &fwd).await?;

    Ok(Redirect::to(&state.patient_client.list_page_url()))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    id: RecordId,
    fwd: Forwarded,
) -> Result<impl IntoResponse, AppError> {
    state.patient_client.delete(&id, &fwd).await?;

    Ok(Redirect::to(&state.patient_client.list_page_url()))
}

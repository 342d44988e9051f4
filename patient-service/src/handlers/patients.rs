use crate::dtos::{PatientRequest, PatientResponse};
use crate::models::Patient;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use service_core::extract::RecordId;

pub async fn list_patients(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let patients = state.repository.find_all().await?;
    tracing::info!(count = patients.len(), "Listing patients");

    Ok(Json(
        patients
            .into_iter()
            .map(PatientResponse::from)
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_patient(
    State(state): State<AppState>,
    id: RecordId,
) -> Result<impl IntoResponse, AppError> {
    let patient = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient {} not found", id)))?;

    Ok(Json(PatientResponse::from(patient)))
}

pub async fn add_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let details = payload.into_details()?;
    let patient = state.repository.insert(details).await?;
    tracing::info!(patient_id = %patient.id, "Patient created");

    Ok((StatusCode::CREATED, Json(PatientResponse::from(patient))))
}

/// Full replace of an existing record. The path id wins over any id in the
/// body; an absent record is never created.
pub async fn update_patient(
    State(state): State<AppState>,
    id: RecordId,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let details = payload.into_details()?;

    let patient = state
        .repository
        .replace_existing(Patient::with_id(id.as_str(), details))
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient {} not found", id)))?;
    tracing::info!(patient_id = %patient.id, "Patient updated");

    Ok(Json(PatientResponse::from(patient)))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    id: RecordId,
) -> Result<impl IntoResponse, AppError> {
    state.repository.delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

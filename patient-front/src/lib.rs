pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::PatientClient;
use std::sync::Arc;

/// Shared application state: the upstream client is the only shared value.
#[derive(Clone)]
pub struct AppState {
    pub patient_client: Arc<PatientClient>,
}

impl AppState {
    pub fn new(patient_client: Arc<PatientClient>) -> Self {
        Self { patient_client }
    }
}

use crate::models::{Patient, PatientDetails};
use crate::services::PatientRepository;
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::extract::RecordId;
use tokio::sync::RwLock;

/// Process-local patient store, kept in insertion order.
#[derive(Default)]
pub struct InMemoryPatientRepository {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn insert(&self, details: PatientDetails) -> Result<Patient, AppError> {
        let patient = Patient::new(details);
        self.patients.write().await.push(patient.clone());
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>, AppError> {
        Ok(self.patients.read().await.clone())
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Patient>, AppError> {
        Ok(self
            .patients
            .read()
            .await
            .iter()
            .find(|p| p.id == id.as_str())
            .cloned())
    }

    async fn save(&self, patient: Patient) -> Result<Patient, AppError> {
        let mut patients = self.patients.write().await;
        match patients.iter_mut().find(|p| p.id == patient.id) {
            Some(existing) => *existing = patient.clone(),
            None => patients.push(patient.clone()),
        }
        Ok(patient)
    }

    async fn replace_existing(&self, patient: Patient) -> Result<Option<Patient>, AppError> {
        let mut patients = self.patients.write().await;
        Ok(patients
            .iter_mut()
            .find(|p| p.id == patient.id)
            .map(|existing| {
                *existing = patient.clone();
                patient
            }))
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<(), AppError> {
        self.patients.write().await.retain(|p| p.id != id.as_str());
        Ok(())
    }
}

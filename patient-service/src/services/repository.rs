//! Record store gateway: key-based CRUD over patient documents.

use crate::models::{Patient, PatientDetails};
use crate::services::MongoDb;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{bson::doc, options::ReplaceOptions, Collection};
use service_core::error::AppError;
use service_core::extract::RecordId;

/// CRUD contract of the patient store.
///
/// Store errors are returned as they come; nothing is retried.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Store a new record under a freshly assigned identifier.
    async fn insert(&self, details: PatientDetails) -> Result<Patient, AppError>;

    /// Every record, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Patient>, AppError>;

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Patient>, AppError>;

    /// Replace the record with `patient.id`, creating it if absent.
    async fn save(&self, patient: Patient) -> Result<Patient, AppError>;

    /// Replace the record with `patient.id` only if it is still stored, as one
    /// store operation. `None` when no such record exists; nothing is created.
    async fn replace_existing(&self, patient: Patient) -> Result<Option<Patient>, AppError>;

    /// Remove the record. Deleting an absent id succeeds.
    async fn delete_by_id(&self, id: &RecordId) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoPatientRepository {
    db: MongoDb,
    collection: Collection<Patient>,
}

impl MongoPatientRepository {
    pub fn new(db: MongoDb) -> Self {
        let collection = db.patients();
        Self { db, collection }
    }
}

#[async_trait]
impl PatientRepository for MongoPatientRepository {
    async fn insert(&self, details: PatientDetails) -> Result<Patient, AppError> {
        let patient = Patient::new(details);
        self.collection.insert_one(&patient, None).await?;
        tracing::info!(patient_id = %patient.id, "Patient inserted");
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>, AppError> {
        let cursor = self.collection.find(None, None).await?;
        let patients: Vec<Patient> = cursor.try_collect().await?;
        Ok(patients)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Patient>, AppError> {
        let patient = self
            .collection
            .find_one(doc! { "_id": id.as_str() }, None)
            .await?;
        Ok(patient)
    }

    async fn save(&self, patient: Patient) -> Result<Patient, AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "_id": patient.id.as_str() }, &patient, options)
            .await?;
        tracing::info!(patient_id = %patient.id, "Patient saved");
        Ok(patient)
    }

    async fn replace_existing(&self, patient: Patient) -> Result<Option<Patient>, AppError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": patient.id.as_str() }, &patient, None)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        tracing::info!(patient_id = %patient.id, "Patient replaced");
        Ok(Some(patient))
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<(), AppError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_str() }, None)
            .await?;
        tracing::info!(
            patient_id = %id,
            deleted = result.deleted_count,
            "Patient delete applied"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

use crate::models::Patient;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

pub const PATIENTS_COLLECTION: &str = "patients";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for patient-service");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1, "firstname": 1 })
            .options(
                IndexOptions::builder()
                    .name("patient_name_lookup".to_string())
                    .build(),
            )
            .build();

        self.patients()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on patients collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on patients.(name, firstname)");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn patients(&self) -> Collection<Patient> {
        self.db.collection(PATIENTS_COLLECTION)
    }
}

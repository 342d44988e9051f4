#![allow(dead_code)]

use patient_service::config::{PatientServiceConfig, StorageBackend};
use patient_service::services::{InMemoryPatientRepository, PatientRepository};
use patient_service::startup::Application;
use std::sync::Arc;

pub const TEST_AUTHORIZATION: &str = "Bearer test-token";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<dyn PatientRepository>,
    pub client: reqwest::Client,
}

pub fn test_config() -> PatientServiceConfig {
    let mut config: PatientServiceConfig =
        serde_json::from_str("{}").expect("Default configuration must deserialize");
    config.common.port = 0; // Random port for testing
    config.storage.backend = StorageBackend::Memory;
    config
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(InMemoryPatientRepository::new())).await
    }

    pub async fn spawn_with(repository: Arc<dyn PatientRepository>) -> Self {
        let app = Application::with_repository(test_config(), repository.clone())
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            repository,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/patientBack{}", self.address, path)
    }

    pub async fn add(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/add"))
            .header("Authorization", TEST_AUTHORIZATION)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list(&self) -> Vec<serde_json::Value> {
        self.client
            .get(self.url("/list"))
            .header("Authorization", TEST_AUTHORIZATION)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }
}

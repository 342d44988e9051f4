use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct PatientServiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    /// Process-local store, lost on restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_mongo_database")]
    pub database: String,
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_database() -> String {
    "patient_db".to_string()
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: default_mongo_database(),
        }
    }
}

impl PatientServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        core_config::load()
    }
}

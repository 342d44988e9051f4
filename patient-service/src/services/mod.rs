pub mod database;
pub mod memory;
pub mod repository;

pub use database::MongoDb;
pub use memory::InMemoryPatientRepository;
pub use repository::{MongoPatientRepository, PatientRepository};
pub use service_core::middleware::metrics::{get_metrics, init_metrics};

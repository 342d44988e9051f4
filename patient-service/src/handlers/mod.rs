pub mod health;
pub mod patients;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use patients::{add_patient, delete_patient, get_patient, list_patients, update_patient};

pub mod patient_client;

pub use patient_client::{Forwarded, PatientClient};
pub use service_core::middleware::metrics::{get_metrics, init_metrics};

pub mod patients;

pub use patients::{PatientRequest, PatientResponse};

pub mod patient;

pub use patient::{Patient, PatientDetails};

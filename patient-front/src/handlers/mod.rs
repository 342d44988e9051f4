pub mod app;
pub mod patients;

pub use app::{health_check, metrics};
pub use patients::{
    add_patient, add_patient_form, delete_patient, list_patients, update_patient,
    update_patient_form,
};

pub mod patient;
pub mod registration;
pub mod search;

pub use patient::{parse_patient_list, PatientService};
pub use registration::validate_registration;
pub use search::filter_patients;

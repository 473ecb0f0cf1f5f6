pub mod availability;
pub mod doctor;
pub mod editor;
pub mod reconciler;
pub mod store;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use editor::{AvailabilityEditor, Deleted, EditorRegistry};
pub use store::CalendarStore;

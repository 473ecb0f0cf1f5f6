pub mod error;
pub mod notification;

pub use error::{AppError, FieldErrors};
pub use notification::{Notification, Severity};

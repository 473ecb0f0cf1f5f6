pub mod aggregator;
pub mod billing;
pub mod board;
pub mod booking;

pub use aggregator::aggregate;
pub use board::{BoardKey, ScheduleBoard};
pub use booking::AppointmentService;

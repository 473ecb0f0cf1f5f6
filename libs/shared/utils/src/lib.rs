pub mod stale;
pub mod test_utils;
pub mod validation;

pub use stale::{StaleGuard, Ticket};
pub use validation::FormValidator;

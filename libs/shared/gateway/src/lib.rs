pub mod client;
pub mod context;
pub mod error;

pub use client::BackendClient;
pub use context::GatewayContext;
pub use error::{upstream_error, GatewayError};
pub use reqwest::Method;

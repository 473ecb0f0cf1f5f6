use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Backend did not respond in time")]
    Timeout,

    #[error("Backend is unreachable: {0}")]
    Unreachable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Network-level failures the user can retry once the backend is back.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout | GatewayError::Unreachable(_) | GatewayError::Transport(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_connect() {
            GatewayError::Unreachable(err.to_string())
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(err.to_string())
        } else {
            AppError::ExternalService(err.to_string())
        }
    }
}

/// Maps a service-layer failure onto the HTTP error it should surface as.
///
/// Backend failures keep their gateway classification; anything else is an
/// internal error prefixed with `context`.
pub fn upstream_error(context: &str, err: anyhow::Error) -> AppError {
    match err.downcast::<GatewayError>() {
        Ok(gateway) => {
            tracing::error!("{}: {}", context, gateway);
            AppError::from(gateway)
        }
        Err(other) => {
            tracing::error!("{}: {}", context, other);
            AppError::Internal(format!("{}: {}", context, other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn backend_failures_keep_their_classification() {
        let err = upstream_error("Failed to load", anyhow::Error::new(GatewayError::Timeout));
        assert_matches!(err, AppError::ExternalService(_));

        let missing = GatewayError::Status { status: 404, body: String::new() };
        assert_matches!(upstream_error("Failed to load", missing.into()), AppError::NotFound(_));
    }

    #[test]
    fn other_failures_are_internal() {
        let err = upstream_error("Failed to load", anyhow::anyhow!("bad state"));
        assert_matches!(err, AppError::Internal(msg) if msg == "Failed to load: bad state");
    }
}

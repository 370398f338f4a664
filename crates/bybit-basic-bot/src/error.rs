/*
[INPUT]:  Validation failures and adapter errors
[OUTPUT]: Tagged error values for order submission and session setup
[POS]:    Error handling layer - bot-level error types
[UPDATE]: When adding failure classes callers need to tell apart
*/

use bybit_basic_adapter::{BybitError, FailureKind};
use thiserror::Error;

use crate::order::ValidationError;

/// Why an order was not placed
#[derive(Debug, Error)]
pub enum OrderError {
    /// Rejected locally, nothing was sent
    #[error("invalid order: {0}")]
    Validation(#[from] ValidationError),

    /// The exchange rejected the parameters
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] BybitError),

    /// Credentials, permissions or throttling
    #[error("authentication or rate limit failure: {0}")]
    AuthOrRateLimit(#[source] BybitError),

    /// Anything else
    #[error("unexpected error: {0}")]
    Unexpected(#[source] BybitError),
}

impl From<BybitError> for OrderError {
    fn from(err: BybitError) -> Self {
        match err.kind() {
            FailureKind::InvalidRequest => OrderError::InvalidRequest(err),
            FailureKind::Authentication | FailureKind::RateLimit => {
                OrderError::AuthOrRateLimit(err)
            }
            FailureKind::Unexpected => OrderError::Unexpected(err),
        }
    }
}

impl OrderError {
    /// True when the order was rejected before any network call
    pub fn is_local(&self) -> bool {
        matches!(self, OrderError::Validation(_))
    }
}

/// Fatal startup failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build exchange client: {0}")]
    Client(#[source] BybitError),

    #[error("liveness check failed: {0}")]
    LivenessCheck(#[source] BybitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_errors_map_to_order_error_classes() {
        let err: OrderError = BybitError::Api {
            code: 10001,
            message: "Qty invalid".to_string(),
        }
        .into();
        assert!(matches!(err, OrderError::InvalidRequest(_)));

        let err: OrderError = BybitError::Api {
            code: 10003,
            message: "API key is invalid".to_string(),
        }
        .into();
        assert!(matches!(err, OrderError::AuthOrRateLimit(_)));

        let err: OrderError = BybitError::Api {
            code: 10006,
            message: "Too many visits".to_string(),
        }
        .into();
        assert!(matches!(err, OrderError::AuthOrRateLimit(_)));

        let err: OrderError = BybitError::InvalidResponse("truncated".to_string()).into();
        assert!(matches!(err, OrderError::Unexpected(_)));
        assert!(!err.is_local());
    }

    #[test]
    fn validation_error_is_local() {
        let err: OrderError = ValidationError::MissingTriggerPrice.into();
        assert!(err.is_local());
        assert_eq!(
            err.to_string(),
            "invalid order: STOP_LIMIT order requires a valid positive trigger price"
        );
    }
}

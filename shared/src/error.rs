//! Error raised by rejection-based endpoint calls
//!
//! `invoke()` never fails: callers inspect [`crate::ApiResult`]. Consumers
//! that prefer rejection-based flows (cache revalidation) call `fetch()`,
//! which turns every non-success result into an [`ApiError`].

use crate::response::ApiResult;
use thiserror::Error;

/// Message carried by errors produced from failed fetches
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching the data.";

/// Thrown client error: message, HTTP status and decoded error payload
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (status {status})")]
pub struct ApiError<E> {
    pub message: String,
    pub status: u16,
    pub payload: Option<E>,
}

impl<E> ApiError<E> {
    pub fn new(message: impl Into<String>, status: u16, payload: Option<E>) -> Self {
        Self {
            message: message.into(),
            status,
            payload,
        }
    }

    /// Error for a fetch that did not succeed
    pub fn fetch_failed(status: u16, payload: Option<E>) -> Self {
        Self::new(FETCH_ERROR_MESSAGE, status, payload)
    }

    /// Whether the server was never reached (or the body was unusable)
    pub fn is_network_failure(&self) -> bool {
        self.status == crate::response::NETWORK_FAILURE_STATUS && self.payload.is_none()
    }
}

impl<T, E> ApiResult<T, E> {
    /// Data on success, an [`ApiError`] with status and payload otherwise
    pub fn into_fetch(self) -> Result<Option<T>, ApiError<E>> {
        self.into_result()
            .map_err(|(status, error)| ApiError::fetch_failed(status, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_fetch_success() {
        let res: ApiResult<u8, String> = ApiResult::Ok {
            data: Some(1),
            status: 200,
        };
        assert_eq!(res.into_fetch().unwrap(), Some(1));
    }

    #[test]
    fn test_into_fetch_failure_keeps_status_and_payload() {
        let res: ApiResult<u8, String> = ApiResult::Err {
            error: Some("bad".into()),
            status: 422,
        };
        let err = res.into_fetch().unwrap_err();
        assert_eq!(err.status, 422);
        assert_eq!(err.payload.as_deref(), Some("bad"));
        assert_eq!(err.message, FETCH_ERROR_MESSAGE);
        assert_eq!(
            err.to_string(),
            "An error occurred while fetching the data. (status 422)"
        );
        assert!(!err.is_network_failure());
    }

    #[test]
    fn test_network_failure_detection() {
        let err: ApiError<()> = ApiResult::<(), ()>::network_failure()
            .into_fetch()
            .unwrap_err();
        assert!(err.is_network_failure());
    }
}

//! Shared types for the API connector
//!
//! Data model used across the connector and its consumers: request
//! building blocks, the normalized result shape, thrown client errors and
//! feedback/notification types.

pub mod error;
pub mod feedback;
pub mod request;
pub mod response;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiError, FETCH_ERROR_MESSAGE};
pub use feedback::{Feedback, FeedbackEvent, FeedbackType, NotificationPolicy, StatusNotification};
pub use request::{FormPart, HeaderLayer, Method, MultipartForm, QueryParams, QueryValue, RequestPayload};
pub use response::{ApiResult, Blob, NETWORK_FAILURE_STATUS, StatusError};

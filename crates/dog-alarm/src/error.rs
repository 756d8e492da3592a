use serde_json::Value;

use crate::utils::{truncate_body, BODY_SNIPPET_CHARS};

/// Caller misuse detected before any network I/O.
///
/// Always recoverable by correcting the input; never retried and never
/// produced by the transport or the service.
///
/// # Examples
///
/// ```rust
/// use dog_alarm::error::InvalidArgument;
///
/// let err = InvalidArgument::InvalidUid(0);
/// assert!(err.to_string().contains("uid"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum InvalidArgument {
    /// `taskid` is zero or not coercible to a nonzero integer.
    #[error("alarm: the configure item `taskid` must be a nonzero integer")]
    InvalidTaskid,

    /// `base_uri` does not parse as an absolute URL.
    #[error("alarm: config `base_uri` must be a valid url, but got `{0}`")]
    InvalidBaseUri(String),

    /// Transport options were rejected while building the HTTP client.
    #[error("alarm: invalid http options: {0}")]
    InvalidHttpOptions(String),

    /// `taskid`/`token` were not configured before issuing a request.
    #[error("alarm: please set configure items `taskid` and `token`")]
    MissingCredentials,

    /// Alarm content is a positional JSON array rather than a keyed object.
    #[error("alarm: field `content` must be a JSON object, not a positional array")]
    ContentNotObject,

    /// An alarm group ID of zero was supplied.
    #[error("alarm: alarm group ID must be a nonzero integer but got {0}")]
    InvalidAlarmGroup(u64),

    /// A channel uid of zero was supplied.
    #[error("alarm: field `uid` must be a nonzero integer but got {0}")]
    InvalidUid(u64),

    /// A DingGroup robot entry is missing its `webhook` or `secret`.
    #[error("alarm: robot field `{0}` is required and must be a non-empty string")]
    EmptyRobotField(&'static str),

    /// A webhook URL failed syntax validation or carries a bad scheme.
    #[error("alarm: webhook `{0}` must be a valid url beginning with http:// or https://")]
    InvalidWebhook(String),
}

/// Dispatch failure, classified by where in the request lifecycle it arose.
///
/// The variants mirror the four failure stages: transport error while
/// sending, non-200 status, malformed response body, and a service-level
/// non-zero `code`. Validation errors pass through transparently so client
/// operations expose a single error type while callers can still match the
/// families independently.
#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The transport failed before a response was obtained.
    #[error("send alarm failed: occured error on sending: {0}")]
    Sending(#[from] reqwest::Error),

    /// The service answered with a status code other than 200.
    #[error("send alarm failed: response status code not 200 but got {status}")]
    BadStatus { status: u16, body: String },

    /// The body is not a JSON object carrying a `code` field.
    #[error("send alarm failed: response data is not a valid json, body: {}", truncate_body(.body, BODY_SNIPPET_CHARS))]
    InvalidBody { body: String },

    /// The service decoded the request but rejected it (`code` != 0).
    #[error("send alarm failed: response error: {msg}")]
    ServiceError { msg: String, json: Value },
}

/// Convenience `Result` alias for dispatch operations.
pub type Result<T> = std::result::Result<T, AlarmError>;

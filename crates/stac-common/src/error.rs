use thiserror::Error;

/// Broad class of a failed catalog request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Non-success HTTP status, or the request never completed.
    Network,
    /// The response arrived but its body could not be decoded.
    DataShape,
}

/// A failed catalog request. `status` is 0 when no HTTP response was received.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: u16,
    pub message: String,
}

impl FetchError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            status,
            message: message.into(),
        }
    }

    /// Transport-level failure: CORS, DNS, offline.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::http(0, message)
    }

    pub fn data_shape(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::DataShape,
            status,
            message: message.into(),
        }
    }

    /// Transient failures are worth one more attempt; client errors and bad
    /// payloads are not.
    pub fn is_transient(&self) -> bool {
        self.kind == FetchErrorKind::Network && (self.status == 0 || self.status >= 500)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::data_shape(200, format!("Malformed catalog response: {}", e))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        Self::transport(format!("Invalid catalog URL: {}", e))
    }
}

use std::fmt;

/// Terminal failure modes of a page fetch. Rate limiting is not represented
/// here: it is retried in place and never ends a fetch.
#[derive(Debug)]
pub enum FetchError {
    Network(reqwest::Error),
    Status(u16),
    Payload(reqwest::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "network error: {err}"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Payload(err) => write!(f, "malformed response payload: {err}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(err) | Self::Payload(err) => Some(err),
            Self::Status(_) => None,
        }
    }
}

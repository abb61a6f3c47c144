use thiserror::Error;

/// Errors raised by the listing proxy client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level errors (connection, DNS, body read)
    #[error("Transport error: {message} (url: {url})")]
    Transport { url: String, message: String },

    /// Non-success HTTP status
    #[error("HTTP error! status: {status} (url: {url})")]
    Http { url: String, status: u16 },

    /// Body could not be decoded into the expected payload
    #[error("Decode error: {message} (url: {url})")]
    Decode { url: String, message: String },
}

impl ApiError {
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(url: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Check if this error is retryable
    ///
    /// The fetch client retries every transport or status failure regardless;
    /// this lets callers tell a flaky proxy from a bad payload.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            ApiError::Decode { .. } => false,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport",
            ApiError::Http { .. } => "http",
            ApiError::Decode { .. } => "decode",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ApiError::Transport { url, .. } => url,
            ApiError::Http { url, .. } => url,
            ApiError::Decode { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        let server = ApiError::Http { url: "u".into(), status: 503 };
        let not_found = ApiError::Http { url: "u".into(), status: 404 };
        let decode = ApiError::Decode { url: "u".into(), message: "eof".into() };

        assert!(server.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(!decode.is_retryable());
        assert_eq!(not_found.category(), "http");
        assert_eq!(decode.url(), "u");
    }

    #[test]
    fn test_display() {
        let err = ApiError::Http { url: "http://x/coins".into(), status: 500 };
        assert_eq!(err.to_string(), "HTTP error! status: 500 (url: http://x/coins)");
    }
}

use crate::api::error::ApiError;
use crate::logging::LogLevel;

/// Decides how loudly a failed request is reported in the activity log.
#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_request_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Critical: the session is gone or the role may not do this
            ApiError::Http { status, .. } if *status == 401 => LogLevel::Error,
            ApiError::Http { status, .. } if *status == 403 => LogLevel::Error,
            ApiError::MissingToken => LogLevel::Error,

            // Temporary server issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Business-rule rejections and bad input, shown inline anyway
            ApiError::Http { .. } => LogLevel::Info,

            // Malformed responses
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn auth_failures_are_errors() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_request_error(&http(401)), LogLevel::Error);
        assert_eq!(classifier.classify_request_error(&http(403)), LogLevel::Error);
        assert_eq!(
            classifier.classify_request_error(&ApiError::MissingToken),
            LogLevel::Error
        );
    }

    #[test]
    fn server_and_client_errors_are_quieter() {
        let classifier = ErrorClassifier::default();
        assert_eq!(classifier.classify_request_error(&http(503)), LogLevel::Warn);
        assert_eq!(classifier.classify_request_error(&http(400)), LogLevel::Info);
        assert_eq!(classifier.classify_request_error(&http(409)), LogLevel::Info);
    }
}

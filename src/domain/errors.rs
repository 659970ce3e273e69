use std::fmt;

// Error contract for every call that crosses into the visitor-management
// backend. Callers branch on the variant; the Display string is what the
// UI shows.
#[derive(Debug)]
pub enum ApiError {
    // No bearer credential was available for an authenticated call.
    MissingAuth,
    // The request never produced an HTTP response.
    Transport(String),
    // The backend replied non-2xx. The message is already resolved from
    // the JSON error envelope, the raw body, or a generic fallback.
    Upstream { status: u16, message: String },
    // The response body did not match the expected schema.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingAuth => write!(f, "Authentication required"),
            ApiError::Transport(err) => write!(f, "backend unreachable: {err}"),
            ApiError::Upstream { message, .. } => write!(f, "{message}"),
            ApiError::Decode(err) => write!(f, "invalid response from backend: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_upstream_error_is_displayed_then_only_the_resolved_message_shows() {
        let err = ApiError::Upstream {
            status: 403,
            message: "Invalid secret code".to_string(),
        };

        assert_eq!(err.to_string(), "Invalid secret code");
    }

    #[test]
    fn when_auth_is_missing_then_display_uses_the_fixed_message() {
        assert_eq!(ApiError::MissingAuth.to_string(), "Authentication required");
    }
}

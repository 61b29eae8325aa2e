use crate::api::ApiError;
use crate::error::AppError;

/// Turn an error into the one-line message shown to the user
///
/// Transport and throttling problems get a generic hint; everything else
/// keeps its own message.
pub fn user_message(error: &AppError) -> String {
    match error {
        AppError::Api(ApiError::RateLimited { retry_after }) => format!(
            "⚠️ Rate Limited: the server is throttling requests. Try again in {} s.",
            retry_after
        ),
        AppError::Api(ApiError::Request(_)) => {
            "⚠️ Network Error: could not reach the expenses server. Please try again."
                .to_string()
        }
        AppError::Usage(usage) => format!("Usage: {}", usage),
        other => format!("❌ {}", other),
    }
}

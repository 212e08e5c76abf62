//! Retry policy and HTTP status classification.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::ListError;

/// Maximum number of attempts for a single API request.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// GitHub error payload, e.g. `{"message": "API rate limit exceeded ..."}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Maps a non-success status and its response body to a [`ListError`].
///
/// 401, 403 and 429 point at a fixable credential or quota problem and become
/// [`ListError::Authentication`]; everything else is [`ListError::Upstream`].
pub fn classify_status(status: StatusCode, body: String) -> ListError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            ListError::Authentication {
                status: status.as_u16(),
                message: api_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request refused")
                        .to_string()
                }),
            }
        }
        _ => ListError::Upstream {
            status: status.as_u16(),
            body,
        },
    }
}

fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
}

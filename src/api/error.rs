use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached, or the response body was unreadable.
    #[error("could not reach backend: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// An authenticated call was attempted without a session token.
    #[error("not logged in")]
    MissingToken,
}

impl ApiError {
    /// Human-readable message for inline display.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Extract a readable message from an error response body.
///
/// FastAPI puts errors in a `detail` field, either a plain string or a
/// validation array of `{msg, loc}` objects. Anything else falls back to
/// the status code.
pub fn normalize_detail(status: u16, body: &str) -> String {
    let fallback = format!("API error: {status}");

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback;
    };

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => {
            let Some(first) = items.first() else {
                return fallback;
            };
            let msg = first.get("msg").and_then(Value::as_str).unwrap_or("invalid input");
            let loc = first
                .get("loc")
                .and_then(Value::as_array)
                .map(|parts| {
                    parts
                        .iter()
                        .map(|p| match p {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(" -> ")
                })
                .unwrap_or_default();
            if loc.is_empty() {
                msg.to_string()
            } else {
                format!("{msg} in {loc}")
            }
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_detail_string_is_used_verbatim() {
        let body = r#"{"detail":"Invalid username or password"}"#;
        assert_eq!(normalize_detail(400, body), "Invalid username or password");
    }

    #[test]
    fn validation_array_renders_first_entry_with_location() {
        let body = r#"{"detail":[{"msg":"field required","loc":["body","title"]}]}"#;
        assert_eq!(normalize_detail(422, body), "field required in body -> title");
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        assert_eq!(normalize_detail(502, "<html>bad gateway</html>"), "API error: 502");
        assert_eq!(normalize_detail(401, "{}"), "API error: 401");
    }
}

use anyhow::{Error, anyhow};
use console::{Emoji, style};
use reqwest::Response;
use serde::Deserialize;

static WARNING: Emoji = Emoji("⚠️  ", "");
static ERROR: Emoji = Emoji("❌ ", "");
static NO_ENTRY: Emoji = Emoji("⛔ ", "");

#[derive(Deserialize)]
struct ErrorResponse {
    reason: String,
}

/// Turns a failed provisioning API response into a user facing error.
pub async fn http_error(response: Response, operation: &str) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .map(|e| e.reason);

    match (status.as_u16(), reason) {
        (400..=499, Some(reason)) => anyhow!("{}{}", NO_ENTRY, style(reason).red()),
        (400..=499, None) if !body.is_empty() => {
            anyhow!("{}Client error ({}): {}", ERROR, status.as_u16(), body)
        }
        (400..=499, None) => anyhow!(
            "{}Client error: {} - {}",
            ERROR,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        ),
        (503, Some(reason)) => anyhow!(
            "{}{}",
            WARNING,
            style(format!("Provisioner temporarily unavailable: {reason}")).yellow()
        ),
        (503, None) => anyhow!("{}Provisioner temporarily unavailable", WARNING),
        (_, _) => anyhow!("Failed to {}: {} - {}", operation, status, body),
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Discord webhook notifications for incoming location reports.
//!
//! Each accepted report becomes one embed: a description line with the
//! resolved coordinate (plus accuracy and a map link), and fields for
//! phone, message, source IP, and user agent. Delivery is a single
//! outbound POST with no retries; the caller decides whether a failure
//! is worth more than a log line.

use chrono::Utc;
use geo_report_models::Coordinate;
use serde::Serialize;
use thiserror::Error;

/// Environment variable naming the webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Embed accent color.
const EMBED_COLOR: u32 = 0x002b_6cb0;

/// Placeholder for absent field values.
const NOT_AVAILABLE: &str = "N/A";

/// Errors from webhook delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("webhook responded with status {status}")]
    Status {
        /// The HTTP status code returned by the webhook.
        status: u16,
    },
}

/// A formatted notification for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportNotification {
    /// Validated coordinate, if the report carried one.
    pub coordinate: Option<Coordinate>,
    /// Geolocation accuracy radius in meters.
    pub accuracy: Option<f64>,
    /// Validated phone number.
    pub phone: Option<String>,
    /// Truncated free-text message.
    pub message: Option<String>,
    /// Source IP as derived from the connection.
    pub source_ip: String,
    /// Reporting browser's user agent string.
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookBody {
    embeds: [Embed; 1],
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    color: u32,
    description: String,
    fields: Vec<EmbedField>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

/// Builds the `Using: <lat>, <lon> (±N m) — [Open map](<url>)` line, or
/// `Using: N/A` when the report carried no usable coordinate.
fn using_line(notification: &ReportNotification) -> String {
    notification.coordinate.map_or_else(
        || format!("Using: {NOT_AVAILABLE}"),
        |coordinate| {
            let accuracy = notification
                .accuracy
                .map(|meters| format!(" (±{meters:.0} m)"))
                .unwrap_or_default();
            format!(
                "Using: {}{} — [Open map]({})",
                coordinate.display_rounded(),
                accuracy,
                coordinate.map_url()
            )
        },
    )
}

fn build_embed(notification: &ReportNotification) -> Embed {
    let field = |name: &str, value: &Option<String>, inline: bool| EmbedField {
        name: name.to_string(),
        value: value
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        inline,
    };

    Embed {
        title: "New location report".to_string(),
        color: EMBED_COLOR,
        description: using_line(notification),
        fields: vec![
            field("Phone", &notification.phone, true),
            field("Message", &notification.message, false),
            EmbedField {
                name: "IP".to_string(),
                value: notification.source_ip.clone(),
                inline: false,
            },
            field("User Agent", &notification.user_agent, false),
        ],
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Delivers a single report notification to the webhook.
///
/// # Errors
///
/// Returns [`NotifyError`] if the request fails or the webhook answers
/// with a non-success status. No retries are attempted.
pub async fn send(
    client: &reqwest::Client,
    webhook_url: &str,
    notification: &ReportNotification,
) -> Result<(), NotifyError> {
    let body = WebhookBody {
        embeds: [build_embed(notification)],
    };
    let resp = client.post(webhook_url).json(&body).send().await?;
    if !resp.status().is_success() {
        return Err(NotifyError::Status {
            status: resp.status().as_u16(),
        });
    }
    Ok(())
}

/// Reads the webhook URL from the environment.
///
/// Absent or blank configuration disables notifications.
#[must_use]
pub fn webhook_url_from_env() -> Option<String> {
    std::env::var(WEBHOOK_URL_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

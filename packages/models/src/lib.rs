#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared wire types and validation for location report submissions.
//!
//! The form controller and the server endpoint validate with the same
//! strict rules, but each runs them independently on raw strings; the
//! server never trusts values the client already checked.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of the free-text message, in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Regex for a strict `"<lat>,<lon>"` pair (whitespace stripped first).
static LAT_LON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d{1,3}(?:\.\d+)?),(-?\d{1,3}(?:\.\d+)?)$").expect("valid regex")
});

/// Regex for a sanitized phone number: optional `+` then 7-16 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{7,16}$").expect("valid regex"));

/// A WGS84 coordinate validated to lat ∈ [-90, 90], lon ∈ [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate if both values are within range.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Google Maps link for this coordinate.
    #[must_use]
    pub fn map_url(&self) -> String {
        format!("https://maps.google.com/?q={},{}", self.lat, self.lon)
    }

    /// 5-decimal rendering used in status lines and notifications.
    #[must_use]
    pub fn display_rounded(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses a strict `"<lat>,<lon>"` string into a [`Coordinate`].
///
/// All whitespace is stripped before matching, so `" 45.1 , -12.3 "` is
/// accepted. Malformed or out-of-range input returns `None` and is
/// treated as absent by callers.
#[must_use]
pub fn parse_lat_lon(raw: &str) -> Option<Coordinate> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let captures = LAT_LON_RE.captures(&cleaned)?;
    let lat: f64 = captures[1].parse().ok()?;
    let lon: f64 = captures[2].parse().ok()?;
    Coordinate::new(lat, lon)
}

/// Strips formatting characters from a raw phone number and validates it.
///
/// Everything except digits and `+` is removed (spaces, dashes,
/// parentheses). Returns the cleaned number when it matches
/// `^\+?\d{7,16}$`, `None` otherwise.
#[must_use]
pub fn sanitize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    PHONE_RE.is_match(&cleaned).then_some(cleaned)
}

/// Trims a free-text message and truncates it to [`MAX_MESSAGE_LEN`]
/// characters. Empty or whitespace-only input is treated as absent.
#[must_use]
pub fn clean_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_MESSAGE_LEN).collect())
}

/// A report submission as posted to `/api/report`.
///
/// Transient — exists only for the duration of one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSubmission {
    /// Raw `"lat,lon"` location string, if any.
    pub location: Option<String>,
    /// Geolocation accuracy radius in meters.
    pub accuracy: Option<f64>,
    /// Phone number (sanitized client-side, re-checked server-side).
    pub phone: Option<String>,
    /// Free-text message.
    pub message: Option<String>,
    /// Reporting browser's user agent string.
    pub user_agent: Option<String>,
}

/// Success/failure envelope returned by the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAck {
    /// Whether the submission was accepted.
    pub success: bool,
    /// Error description, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportAck {
    /// The success envelope.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failure envelope with the given error description.
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

//! Copy strings for the form UI.
//!
//! Every message the controller can render is enumerated here with a
//! hardcoded English default. Hosts override individual keys by passing
//! a JSON blob to [`CopyBundle::from_json`]; missing keys keep their
//! defaults and an unparseable blob falls back to the defaults wholesale.

use serde::Deserialize;

/// Status-line copy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCopy {
    /// Shown while a geolocation request is in flight.
    pub requesting: String,
    /// Shown when no location is set.
    pub not_set: String,
    /// Prefix for the resolved-location line.
    pub using_prefix: String,
    /// Accuracy suffix template with a `{meters}` placeholder.
    pub accuracy: String,
    /// Label of the map link.
    pub open_map: String,
    /// Shown when a honeypot submission is short-circuited.
    pub thanks: String,
    /// Shown after a successful submission.
    pub success: String,
}

impl Default for StatusCopy {
    fn default() -> Self {
        Self {
            requesting: "Requesting location…".to_string(),
            not_set: String::new(),
            using_prefix: "Using:".to_string(),
            accuracy: " (±{meters} m)".to_string(),
            open_map: "Open map".to_string(),
            thanks: "Thanks!".to_string(),
            success: "Success!".to_string(),
        }
    }
}

/// Error copy, one entry per classified failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorCopy {
    /// Geolocation capability missing.
    pub unsupported: String,
    /// Page is not served from a secure context.
    pub insecure_context: String,
    /// Embedding policy denies geolocation.
    pub policy_blocked: String,
    /// Permission denied by the user or site settings.
    pub permission_denied: String,
    /// The positioning capability could not produce a fix.
    pub position_unavailable: String,
    /// The geolocation request timed out.
    pub timeout: String,
    /// The report submission failed.
    pub submission_failed: String,
    /// Catch-all template with a `{message}` placeholder.
    pub generic: String,
    /// Appended when a failure is likely caused by the embedding policy.
    pub policy_hint: String,
}

impl Default for ErrorCopy {
    fn default() -> Self {
        Self {
            unsupported: "Geolocation is not supported by this browser.".to_string(),
            insecure_context: "Geolocation requires HTTPS (or localhost during development)."
                .to_string(),
            policy_blocked:
                "This page is embedded without geolocation permission. The parent page must allow it."
                    .to_string(),
            permission_denied:
                "Location permission is blocked for this site. Enable it in your browser settings."
                    .to_string(),
            position_unavailable: "Position unavailable.".to_string(),
            timeout: "Location request timed out.".to_string(),
            submission_failed: "Submission failed.".to_string(),
            generic: "Error: {message}".to_string(),
            policy_hint: " (Blocked by embedding policy.)".to_string(),
        }
    }
}

/// All copy recognized by the form controller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyBundle {
    /// Status-line strings.
    pub status: StatusCopy,
    /// Error strings.
    pub errors: ErrorCopy,
}

impl CopyBundle {
    /// Resolves copy from an optional host-provided JSON blob.
    ///
    /// Unrecognized keys are ignored; missing keys keep their English
    /// defaults. A blob that fails to parse logs a warning and yields
    /// the full defaults.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(copy) => copy,
            Err(e) => {
                log::warn!("Failed to parse copy overrides, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Fills a single `{key}` placeholder in a copy template.
#[must_use]
pub fn fill(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_key() {
        let copy = CopyBundle::default();
        assert!(!copy.status.requesting.is_empty());
        assert!(!copy.errors.timeout.is_empty());
        assert!(copy.errors.generic.contains("{message}"));
        assert!(copy.status.accuracy.contains("{meters}"));
    }

    #[test]
    fn partial_overrides_keep_defaults() {
        let copy = CopyBundle::from_json(r#"{"status":{"thanks":"Merci!"}}"#);
        assert_eq!(copy.status.thanks, "Merci!");
        assert_eq!(copy.status.success, "Success!");
        assert_eq!(copy.errors.timeout, ErrorCopy::default().timeout);
    }

    #[test]
    fn unparseable_blob_falls_back_wholesale() {
        let copy = CopyBundle::from_json("{not json");
        assert_eq!(copy.status.thanks, "Thanks!");
    }

    #[test]
    fn fills_template_placeholder() {
        assert_eq!(fill(" (±{meters} m)", "meters", "25"), " (±25 m)");
        assert_eq!(fill("Error: {message}", "message", "boom"), "Error: boom");
    }
}

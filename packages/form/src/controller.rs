//! The form component: state, user actions, and status rendering.
//!
//! State the page keeps in input fields lives here as plain strings; the
//! host forwards input events to the setters and reads back the rendered
//! status values after each action. A busy flag guards re-entrancy while
//! an action is in flight (the host disables the triggering buttons for
//! the same duration).

use geo_report_models::{Coordinate, ReportSubmission, clean_message, parse_lat_lon, sanitize_phone};

use crate::copy::{CopyBundle, fill};
use crate::geo::{
    GEOLOCATION_TIMEOUT, GeoError, GeoPlatform, LocationSource, PermissionState, PositionFix,
    acquire_position, preflight,
};
use crate::submit::{SubmitError, SubmitReport};

/// Kind of a rendered status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Neutral progress information.
    Info,
    /// A completed action.
    Ok,
    /// A recovered failure.
    Err,
}

/// A status line for the host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// The copy-resolved message text.
    pub text: String,
    /// How the host should style the line.
    pub kind: StatusKind,
}

impl StatusLine {
    fn ok(text: String) -> Self {
        Self {
            text,
            kind: StatusKind::Ok,
        }
    }

    fn err(text: String) -> Self {
        Self {
            text,
            kind: StatusKind::Err,
        }
    }
}

/// The report form component.
pub struct ReportForm {
    copy: CopyBundle,
    user_agent: Option<String>,
    mounted: bool,
    busy: bool,
    fix: Option<PositionFix>,
    location_input: String,
    phone_input: String,
    message_input: String,
    honeypot: String,
    status: Option<StatusLine>,
    location_status: String,
}

impl ReportForm {
    /// Creates an unmounted form with the given copy and the reporting
    /// user agent string.
    #[must_use]
    pub fn new(copy: CopyBundle, user_agent: Option<String>) -> Self {
        Self {
            copy,
            user_agent,
            mounted: false,
            busy: false,
            fix: None,
            location_input: String::new(),
            phone_input: String::new(),
            message_input: String::new(),
            honeypot: String::new(),
            status: None,
            location_status: String::new(),
        }
    }

    /// Mounts the component and renders the initial location status.
    ///
    /// Mounting is idempotent: the instance owns its initialized flag,
    /// and repeat calls are no-ops. Returns whether this call performed
    /// the mount.
    pub fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.render_location_status();
        true
    }

    /// The general status line, if any action has set one.
    #[must_use]
    pub const fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// The rendered location status line.
    #[must_use]
    pub fn location_status(&self) -> &str {
        &self.location_status
    }

    /// Current value of the location input field.
    #[must_use]
    pub fn location_input(&self) -> &str {
        &self.location_input
    }

    /// The stored position fix, if any.
    #[must_use]
    pub const fn fix(&self) -> Option<PositionFix> {
        self.fix
    }

    /// Whether an action is currently in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Forwards the phone input field value.
    pub fn set_phone_input(&mut self, text: &str) {
        self.phone_input = text.to_string();
    }

    /// Forwards the message field value.
    pub fn set_message_input(&mut self, text: &str) {
        self.message_input = text.to_string();
    }

    /// Forwards the hidden honeypot field value.
    pub fn set_honeypot(&mut self, text: &str) {
        self.honeypot = text.to_string();
    }

    /// Live-parses manual location input.
    ///
    /// A valid `"lat,lon"` pair overrides the stored fix (with no
    /// accuracy); anything else clears it, so the stored coordinate can
    /// never disagree with what the field shows.
    pub fn set_location_input(&mut self, text: &str) {
        self.location_input = text.to_string();
        self.fix = parse_lat_lon(text).map(|coordinate| PositionFix {
            coordinate,
            accuracy: None,
        });
        self.render_location_status();
    }

    /// The "use my location" action.
    ///
    /// Runs the preflight checks, re-checks the permission state right
    /// before requesting (denial can land between the two), then acquires
    /// a position bounded by [`GEOLOCATION_TIMEOUT`]. Success stores the
    /// fix and mirrors it into the location input; every failure renders
    /// its copy-driven message instead.
    pub async fn use_my_location(
        &mut self,
        platform: &dyn GeoPlatform,
        source: &dyn LocationSource,
    ) {
        if !self.mounted || self.busy {
            return;
        }
        self.busy = true;
        self.status = None;
        self.location_status = self.copy.status.requesting.clone();

        if let Err(err) = preflight(platform).await {
            self.status = Some(StatusLine::err(self.geo_error_message(&err)));
            self.render_location_status();
            self.busy = false;
            return;
        }

        let result = if platform.permission_state().await == PermissionState::Denied {
            Err(GeoError::PermissionDenied)
        } else {
            acquire_position(source, GEOLOCATION_TIMEOUT).await
        };

        match result {
            Ok(fix) => {
                self.fix = Some(fix);
                self.location_input = fix.coordinate.to_string();
            }
            Err(err) => {
                self.fix = None;
                log::warn!("Geolocation failed: {err}");
                let mut text = self.geo_error_message(&err);
                // Embedded hosts can report a generic failure when the
                // real cause is the embedding policy.
                if platform.is_secure_context()
                    && platform.is_embedded()
                    && !platform.policy_allows_geolocation()
                {
                    text.push_str(&self.copy.errors.policy_hint);
                }
                self.status = Some(StatusLine::err(text));
            }
        }
        self.render_location_status();
        self.busy = false;
    }

    /// The "clear" action: resets all location state.
    pub fn clear_location(&mut self) {
        self.fix = None;
        self.location_input.clear();
        self.status = None;
        self.render_location_status();
    }

    /// The "submit" action.
    ///
    /// A filled honeypot field short-circuits to a fake success without
    /// touching the network. Otherwise the payload is assembled, the form
    /// goes busy for the duration of the request, and the outcome is
    /// rendered as a status line; success also resets the form fields.
    pub async fn submit(&mut self, submitter: &dyn SubmitReport) {
        if !self.mounted || self.busy {
            return;
        }
        self.status = None;

        if !self.honeypot.is_empty() {
            self.status = Some(StatusLine::ok(self.copy.status.thanks.clone()));
            return;
        }

        let payload = self.assemble();
        self.busy = true;
        match submitter.submit(&payload).await {
            Ok(_) => {
                self.status = Some(StatusLine::ok(self.copy.status.success.clone()));
                self.fix = None;
                self.location_input.clear();
                self.phone_input.clear();
                self.message_input.clear();
                self.render_location_status();
            }
            Err(err) => {
                let text = match err {
                    SubmitError::Rejected { message } if !message.trim().is_empty() => message,
                    _ => self.copy.errors.submission_failed.clone(),
                };
                self.status = Some(StatusLine::err(text));
            }
        }
        self.busy = false;
    }

    /// Assembles the wire payload from the current form state.
    ///
    /// The stored fix wins; otherwise the raw location field is parsed
    /// one more time so a manually entered pair survives a failed
    /// geolocation attempt.
    fn assemble(&self) -> ReportSubmission {
        let manual = parse_lat_lon(&self.location_input);
        let coordinate: Option<Coordinate> = self.fix.map(|f| f.coordinate).or(manual);
        ReportSubmission {
            location: coordinate.map(|c| c.to_string()),
            accuracy: self.fix.and_then(|f| f.accuracy),
            phone: sanitize_phone(&self.phone_input),
            message: clean_message(&self.message_input),
            user_agent: self.user_agent.clone(),
        }
    }

    fn geo_error_message(&self, err: &GeoError) -> String {
        let errors = &self.copy.errors;
        match err {
            GeoError::Unsupported => errors.unsupported.clone(),
            GeoError::InsecureContext => errors.insecure_context.clone(),
            GeoError::PolicyBlocked => errors.policy_blocked.clone(),
            GeoError::PermissionDenied => errors.permission_denied.clone(),
            GeoError::PositionUnavailable => errors.position_unavailable.clone(),
            GeoError::Timeout => errors.timeout.clone(),
            GeoError::Other(message) => fill(&errors.generic, "message", message),
        }
    }

    fn render_location_status(&mut self) {
        match self.fix {
            None => self.location_status = self.copy.status.not_set.clone(),
            Some(fix) => {
                let status = &self.copy.status;
                let accuracy = fix
                    .accuracy
                    .map(|meters| fill(&status.accuracy, "meters", &format!("{meters:.0}")))
                    .unwrap_or_default();
                let mut line = String::new();
                if !status.using_prefix.is_empty() {
                    line.push_str(&status.using_prefix);
                    line.push(' ');
                }
                line.push_str(&fix.coordinate.display_rounded());
                line.push_str(&accuracy);
                line.push_str(&format!(
                    " — [{}]({})",
                    status.open_map,
                    fix.coordinate.map_url()
                ));
                self.location_status = line;
            }
        }
    }
}

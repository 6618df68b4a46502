#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless controller for the location report form.
//!
//! The controller owns all form state and exposes the user actions as
//! async operations; a host binds its input fields to the setters and
//! renders the typed status values. The positioning capability, the
//! environment preflight checks, and the submission endpoint sit behind
//! the [`LocationSource`], [`GeoPlatform`], and [`SubmitReport`] trait
//! seams so the controller can be driven against any host (or mocks in
//! tests).
//!
//! Every user-visible string is resolved from a [`CopyBundle`] once at
//! construction; hosts override individual keys via a JSON blob.

pub mod controller;
pub mod copy;
pub mod geo;
pub mod submit;

pub use controller::{ReportForm, StatusKind, StatusLine};
pub use copy::CopyBundle;
pub use geo::{
    GEOLOCATION_TIMEOUT, GeoError, GeoPlatform, LocationSource, PermissionState, PositionFix,
    acquire_position, preflight,
};
pub use submit::{HttpSubmitter, SubmitError, SubmitReport};

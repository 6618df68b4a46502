//! Geolocation preflight and timeout-bounded acquisition.
//!
//! The preflight predicts likely failures (missing capability, insecure
//! context, embedding policy, prior denial) without invoking the
//! positioning capability, so the controller can explain the problem
//! instead of silently hanging on a request that can never succeed.

use std::time::Duration;

use async_trait::async_trait;
use geo_report_models::Coordinate;
use thiserror::Error;

/// Bound on a single geolocation request.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(20);

/// A successful position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// The resolved coordinate.
    pub coordinate: Coordinate,
    /// Accuracy radius in meters, when the source reports one.
    pub accuracy: Option<f64>,
}

/// Classified geolocation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    /// The host exposes no geolocation capability.
    #[error("geolocation is not supported by this host")]
    Unsupported,
    /// The page is not served from a secure context.
    #[error("geolocation requires a secure context")]
    InsecureContext,
    /// The embedding policy denies geolocation to this document.
    #[error("embedding policy denies geolocation")]
    PolicyBlocked,
    /// The user or site settings deny the permission.
    #[error("location permission denied")]
    PermissionDenied,
    /// The source could not produce a fix.
    #[error("position unavailable")]
    PositionUnavailable,
    /// The request exceeded its time bound.
    #[error("location request timed out")]
    Timeout,
    /// Any other failure, with the source's description.
    #[error("geolocation failed: {0}")]
    Other(String),
}

/// Result of a permission-state query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Permission already granted.
    Granted,
    /// Permission denied; a request would fail immediately.
    Denied,
    /// The host will prompt the user on request.
    Prompt,
    /// The host cannot report a state (no Permissions API).
    Unknown,
}

/// Read-only view of the host environment, used for preflight checks.
#[async_trait]
pub trait GeoPlatform: Send + Sync {
    /// Whether the host exposes a geolocation capability at all.
    fn supports_geolocation(&self) -> bool;

    /// Whether the page runs in a secure context (HTTPS or localhost).
    fn is_secure_context(&self) -> bool;

    /// Whether the page is embedded in another document.
    fn is_embedded(&self) -> bool;

    /// Whether the embedding policy allows geolocation. Hosts that
    /// cannot tell report `true`, so the request itself surfaces the
    /// failure.
    fn policy_allows_geolocation(&self) -> bool;

    /// Current geolocation permission state.
    async fn permission_state(&self) -> PermissionState;
}

/// The positioning capability itself (read-only collaborator).
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Requests the current position once.
    async fn current_position(&self) -> Result<PositionFix, GeoError>;
}

/// Predicts likely geolocation failure without invoking the capability.
///
/// Checks run in order: capability support, secure context, embedding
/// policy, prior permission denial.
///
/// # Errors
///
/// Returns the classified [`GeoError`] for the first failing check.
pub async fn preflight(platform: &dyn GeoPlatform) -> Result<(), GeoError> {
    if !platform.supports_geolocation() {
        return Err(GeoError::Unsupported);
    }
    if !platform.is_secure_context() {
        return Err(GeoError::InsecureContext);
    }
    if platform.is_embedded() && !platform.policy_allows_geolocation() {
        return Err(GeoError::PolicyBlocked);
    }
    if platform.permission_state().await == PermissionState::Denied {
        return Err(GeoError::PermissionDenied);
    }
    Ok(())
}

/// Requests the current position, bounded by `timeout`.
///
/// The pending request is dropped when the timer elapses.
///
/// # Errors
///
/// Returns [`GeoError::Timeout`] when the bound elapses, or the source's
/// own classified failure.
pub async fn acquire_position(
    source: &dyn LocationSource,
    timeout: Duration,
) -> Result<PositionFix, GeoError> {
    (tokio::time::timeout(timeout, source.current_position()).await)
        .unwrap_or(Err(GeoError::Timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_report_models::parse_lat_lon;

    struct FakePlatform {
        supported: bool,
        secure: bool,
        embedded: bool,
        policy_allows: bool,
        permission: PermissionState,
    }

    impl FakePlatform {
        const fn all_clear() -> Self {
            Self {
                supported: true,
                secure: true,
                embedded: false,
                policy_allows: true,
                permission: PermissionState::Prompt,
            }
        }
    }

    #[async_trait]
    impl GeoPlatform for FakePlatform {
        fn supports_geolocation(&self) -> bool {
            self.supported
        }

        fn is_secure_context(&self) -> bool {
            self.secure
        }

        fn is_embedded(&self) -> bool {
            self.embedded
        }

        fn policy_allows_geolocation(&self) -> bool {
            self.policy_allows
        }

        async fn permission_state(&self) -> PermissionState {
            self.permission
        }
    }

    struct NeverSource;

    #[async_trait]
    impl LocationSource for NeverSource {
        async fn current_position(&self) -> Result<PositionFix, GeoError> {
            std::future::pending().await
        }
    }

    struct FixedSource(PositionFix);

    #[async_trait]
    impl LocationSource for FixedSource {
        async fn current_position(&self) -> Result<PositionFix, GeoError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn preflight_passes_when_all_clear() {
        assert_eq!(preflight(&FakePlatform::all_clear()).await, Ok(()));
    }

    #[tokio::test]
    async fn preflight_rejects_unsupported_first() {
        let platform = FakePlatform {
            supported: false,
            secure: false,
            permission: PermissionState::Denied,
            ..FakePlatform::all_clear()
        };
        assert_eq!(preflight(&platform).await, Err(GeoError::Unsupported));
    }

    #[tokio::test]
    async fn preflight_rejects_insecure_context() {
        let platform = FakePlatform {
            secure: false,
            ..FakePlatform::all_clear()
        };
        assert_eq!(preflight(&platform).await, Err(GeoError::InsecureContext));
    }

    #[tokio::test]
    async fn preflight_rejects_embedded_without_policy() {
        let platform = FakePlatform {
            embedded: true,
            policy_allows: false,
            ..FakePlatform::all_clear()
        };
        assert_eq!(preflight(&platform).await, Err(GeoError::PolicyBlocked));
    }

    #[tokio::test]
    async fn preflight_allows_embedded_with_policy() {
        let platform = FakePlatform {
            embedded: true,
            ..FakePlatform::all_clear()
        };
        assert_eq!(preflight(&platform).await, Ok(()));
    }

    #[tokio::test]
    async fn preflight_rejects_prior_denial() {
        let platform = FakePlatform {
            permission: PermissionState::Denied,
            ..FakePlatform::all_clear()
        };
        assert_eq!(preflight(&platform).await, Err(GeoError::PermissionDenied));
    }

    #[tokio::test(start_paused = true)]
    async fn acquisition_times_out() {
        let result = acquire_position(&NeverSource, GEOLOCATION_TIMEOUT).await;
        assert_eq!(result, Err(GeoError::Timeout));
    }

    #[tokio::test]
    async fn acquisition_returns_fix() {
        let fix = PositionFix {
            coordinate: parse_lat_lon("45.1,-12.3").unwrap(),
            accuracy: Some(25.0),
        };
        let result = acquire_position(&FixedSource(fix), GEOLOCATION_TIMEOUT).await;
        assert_eq!(result, Ok(fix));
    }
}

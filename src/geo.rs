/// User geolocation: request options, cached-position staleness, and the
/// mapping of browser failures onto service errors.
///
/// A locate request is a single best-effort attempt. Timeouts and refusals
/// become a notice; nothing is retried.
///
/// # Clock injection
/// Staleness functions take `now: DateTime<Utc>` rather than calling
/// `Utc::now()` internally, so tests stay deterministic.

use chrono::{DateTime, Utc};

use crate::model::{Coordinates, SourcesError};

/// Zoom level used when centring on the user.
pub const USER_ZOOM: u8 = 12;

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Options passed along with a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    /// Longest wait for a fix.
    pub timeout_secs: u64,
    /// Oldest cached fix still acceptable.
    pub maximum_age_secs: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        GeolocationOptions {
            high_accuracy: true,
            timeout_secs: 10,
            maximum_age_secs: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinates: Coordinates,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

/// Failure reported by the browser's geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    /// No geolocation API at all.
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl From<PositionError> for SourcesError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Unsupported | PositionError::PositionUnavailable => {
                SourcesError::GeolocationUnavailable
            }
            PositionError::PermissionDenied => SourcesError::GeolocationDenied,
            PositionError::Timeout => SourcesError::GeolocationTimeout,
        }
    }
}

/// Returns `true` if `position` is older than `max_age_secs` relative to
/// `now`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_secs  →  stale
///   age == max_age_secs →  not stale
/// A fix stamped in the future (clock skew) is not stale.
pub fn is_stale_at(position: &Position, max_age_secs: u64, now: DateTime<Utc>) -> bool {
    let age = (now - position.timestamp).num_seconds();
    age > 0 && age as u64 > max_age_secs
}

/// Last known user position.
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    last: Option<Position>,
}

impl PositionCache {
    pub fn remember(&mut self, position: Position) {
        self.last = Some(position);
    }

    /// The cached fix, if it is still within `max_age_secs` of `now`.
    pub fn fresh_at(&self, max_age_secs: u64, now: DateTime<Utc>) -> Option<Position> {
        self.last.filter(|p| !is_stale_at(p, max_age_secs, now))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// A fixed "now" used across all tests: 2025-06-15 10:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
    }

    fn position_at(h: u32, m: u32, s: u32) -> Position {
        Position {
            coordinates: Coordinates { lat: 44.89, lng: 1.21 },
            timestamp: Utc.with_ymd_and_hms(2025, 6, 15, h, m, s).unwrap(),
        }
    }

    // --- Not stale ----------------------------------------------------------

    #[test]
    fn test_fix_one_minute_old_is_not_stale() {
        assert!(!is_stale_at(&position_at(9, 59, 0), 300, fixed_now()));
    }

    #[test]
    fn test_fix_exactly_at_maximum_age_is_not_stale() {
        // 5 minutes exactly; strictly greater than is required.
        assert!(!is_stale_at(&position_at(9, 55, 0), 300, fixed_now()));
    }

    #[test]
    fn test_fix_from_the_future_is_not_stale() {
        assert!(!is_stale_at(&position_at(10, 5, 0), 300, fixed_now()));
    }

    // --- Stale --------------------------------------------------------------

    #[test]
    fn test_fix_one_second_past_maximum_age_is_stale() {
        assert!(is_stale_at(&position_at(9, 54, 59), 300, fixed_now()));
    }

    #[test]
    fn test_cache_serves_only_fresh_fixes() {
        let mut cache = PositionCache::default();
        assert!(cache.fresh_at(300, fixed_now()).is_none());

        cache.remember(position_at(9, 58, 0));
        assert!(cache.fresh_at(300, fixed_now()).is_some());
        assert!(cache.fresh_at(60, fixed_now()).is_none());
    }

    // --- Errors -------------------------------------------------------------

    #[test]
    fn test_position_errors_map_to_service_errors() {
        assert_eq!(SourcesError::from(PositionError::Timeout), SourcesError::GeolocationTimeout);
        assert_eq!(SourcesError::from(PositionError::PermissionDenied), SourcesError::GeolocationDenied);
        assert_eq!(SourcesError::from(PositionError::Unsupported), SourcesError::GeolocationUnavailable);
        assert_eq!(
            SourcesError::from(PositionError::PositionUnavailable),
            SourcesError::GeolocationUnavailable
        );
    }

    #[test]
    fn test_default_options() {
        let options = GeolocationOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout_secs, 10);
        assert_eq!(options.maximum_age_secs, 300);
    }
}

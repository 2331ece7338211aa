/// Glue between the source store and the external map provider.
///
/// The provider draws the map; this side only tells it where pins go, how
/// they look, and what their popups say. Pin placement is idempotent: every
/// population clears the provider's pins first.

use crate::model::{AnalysisStatus, Coordinates};
use crate::render::MapPin;

/// Zoom level used when focusing a single source.
pub const SOURCE_ZOOM: u8 = 15;

/// Commands the core issues to the map provider.
pub trait MapProvider {
    fn clear_pins(&mut self);
    fn place_pin(&mut self, pin: &MapPin);
    fn set_pin_visible(&mut self, source_id: &str, visible: bool);
    fn center_on(&mut self, position: Coordinates, zoom: u8);
    fn open_popup(&mut self, source_id: &str);
    fn close_popups(&mut self);
    /// Marks the user's own position.
    fn show_user_position(&mut self, position: Coordinates);
}

// ---------------------------------------------------------------------------
// Readiness latch
// ---------------------------------------------------------------------------

/// Joins the two independent start-up events, map ready and data ready.
///
/// Whichever arrives second fires the latch; it fires exactly once.
#[derive(Debug, Clone, Default)]
pub struct ReadinessLatch {
    map_ready: bool,
    data_ready: bool,
    fired: bool,
}

impl ReadinessLatch {
    /// Records map readiness. Returns `true` if this completes the latch.
    pub fn map_ready(&mut self) -> bool {
        self.map_ready = true;
        self.try_fire()
    }

    /// Records data readiness. Returns `true` if this completes the latch.
    pub fn data_ready(&mut self) -> bool {
        self.data_ready = true;
        self.try_fire()
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn is_data_ready(&self) -> bool {
        self.data_ready
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    fn try_fire(&mut self) -> bool {
        if self.map_ready && self.data_ready && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Status filters
// ---------------------------------------------------------------------------

/// Which statuses are shown on the map. Everything is shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub compliant: bool,
    pub non_compliant: bool,
    pub pending: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter { compliant: true, non_compliant: true, pending: true }
    }
}

impl StatusFilter {
    pub fn shows(&self, status: AnalysisStatus) -> bool {
        match status {
            AnalysisStatus::Compliant => self.compliant,
            AnalysisStatus::NonCompliant => self.non_compliant,
            AnalysisStatus::Pending => self.pending,
        }
    }

    pub fn set(&mut self, status: AnalysisStatus, shown: bool) {
        match status {
            AnalysisStatus::Compliant => self.compliant = shown,
            AnalysisStatus::NonCompliant => self.non_compliant = shown,
            AnalysisStatus::Pending => self.pending = shown,
        }
    }
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// The pins currently placed on the map.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    pins: Vec<MapPin>,
}

impl MarkerLayer {
    /// Replaces every pin on the provider with `pins`.
    pub fn populate(&mut self, map: &mut dyn MapProvider, pins: Vec<MapPin>) {
        map.clear_pins();
        for pin in &pins {
            map.place_pin(pin);
        }
        self.pins = pins;
    }

    pub fn pins(&self) -> &[MapPin] {
        &self.pins
    }

    pub fn find(&self, source_id: &str) -> Option<&MapPin> {
        self.pins.iter().find(|p| p.source_id == source_id)
    }

    /// Opens the popup of a clicked pin, closing any other first.
    pub fn select(&self, map: &mut dyn MapProvider, source_id: &str) -> bool {
        if self.find(source_id).is_none() {
            return false;
        }
        map.close_popups();
        map.open_popup(source_id);
        true
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

/// In-memory provider that records what it was told. Used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub pins: Vec<MapPin>,
    pub hidden: std::collections::HashSet<String>,
    pub center: Option<(Coordinates, u8)>,
    pub open_popup: Option<String>,
    pub user_position: Option<Coordinates>,
    pub clear_calls: usize,
    pub place_calls: usize,
}

#[cfg(test)]
impl MapProvider for RecordingMap {
    fn clear_pins(&mut self) {
        self.pins.clear();
        self.clear_calls += 1;
    }

    fn place_pin(&mut self, pin: &MapPin) {
        self.pins.push(pin.clone());
        self.place_calls += 1;
    }

    fn set_pin_visible(&mut self, source_id: &str, visible: bool) {
        if visible {
            self.hidden.remove(source_id);
        } else {
            self.hidden.insert(source_id.to_string());
        }
    }

    fn center_on(&mut self, position: Coordinates, zoom: u8) {
        self.center = Some((position, zoom));
    }

    fn open_popup(&mut self, source_id: &str) {
        self.open_popup = Some(source_id.to_string());
    }

    fn close_popups(&mut self) {
        self.open_popup = None;
    }

    fn show_user_position(&mut self, position: Coordinates) {
        self.user_position = Some(position);
    }
}

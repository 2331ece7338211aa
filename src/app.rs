/// Page-level coordination.
///
/// `AppContext` owns everything one page session holds: the loaded records,
/// the detail panel and address bar, the placed markers, the readiness latch,
/// the status filters and the last known user position. Browser events come in
/// through its `handle_*`/`on_*` methods; user-facing messages queue up as
/// notices until the page takes them.

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::actions::{self, ProblemReport, ShareCapability, ShareDelivery};
use crate::config::Config;
use crate::geo::{GeolocationOptions, Position, PositionCache, PositionError, USER_ZOOM};
use crate::ingest::{DataOrigin, LoadOutcome};
use crate::logging::{self, Component};
use crate::map::{MapProvider, MarkerLayer, ReadinessLatch, StatusFilter, SOURCE_ZOOM};
use crate::model::{Coordinates, Notice, SourceRecord, SourcesError};
use crate::panel::{self, DetailPanel, PageState};
use crate::render::{self, RenderOptions};
use crate::store::{SourceStore, SourceSummary};

/// Where a click inside the open panel's overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed background around the panel.
    Backdrop,
    /// Anything inside the panel itself.
    Content,
}

/// The `data-action` values carried by rendered buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Share,
    ShowOnMap,
    ReportProblem,
}

impl Action {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Action::Open),
            "share" => Some(Action::Share),
            "show-on-map" => Some(Action::ShowOnMap),
            "report-problem" => Some(Action::ReportProblem),
            _ => None,
        }
    }
}

/// What the page has to carry out after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Everything happened in-core.
    Done,
    Share(ShareDelivery),
    /// Navigate to this `mailto:` link.
    Mail(String),
    /// Unknown id or unusable record; a notice was queued.
    Ignored,
}

/// How to satisfy a locate request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocateRequest {
    /// A recent enough fix is already known.
    Cached(Position),
    /// Ask the browser with these options.
    Ask(GeolocationOptions),
}

pub struct AppContext {
    config: Config,
    render_options: RenderOptions,
    geolocation: GeolocationOptions,
    store: SourceStore,
    origin: Option<DataOrigin>,
    page: PageState,
    panel: DetailPanel,
    markers: MarkerLayer,
    latch: ReadinessLatch,
    filter: StatusFilter,
    positions: PositionCache,
    notices: Vec<Notice>,
    pending_deep_link: Option<String>,
}

impl AppContext {
    /// Starts a session on `page_url`. A `source` parameter in it is
    /// remembered and opened once data arrives.
    pub fn new(config: Config, page_url: &str) -> Result<Self, SourcesError> {
        let page = PageState::new(page_url)?;
        let pending_deep_link = page.source_param();
        Ok(AppContext {
            render_options: config.render_options(),
            geolocation: config.geolocation_options(),
            config,
            store: SourceStore::default(),
            origin: None,
            page,
            panel: DetailPanel::default(),
            markers: MarkerLayer::default(),
            latch: ReadinessLatch::default(),
            filter: StatusFilter::default(),
            positions: PositionCache::default(),
            notices: Vec::new(),
            pending_deep_link,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn store(&self) -> &SourceStore {
        &self.store
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        self.origin
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn summary(&self) -> SourceSummary {
        self.store.summary()
    }

    /// Centre and zoom the map starts on.
    pub fn initial_view(&self) -> (Coordinates, u8) {
        (self.config.map_center(), self.config.map.zoom)
    }

    /// Drains the queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -----------------------------------------------------------------------
    // Start-up
    // -----------------------------------------------------------------------

    /// Installs freshly loaded records.
    ///
    /// Markers are placed once both the map and the data are ready; a later
    /// load re-places them. A pending deep link opens here.
    pub fn on_data_loaded(&mut self, outcome: LoadOutcome, map: &mut dyn MapProvider) {
        self.store = SourceStore::new(outcome.records);
        self.origin = Some(outcome.origin);
        if let Some(warning) = &outcome.warning {
            self.notices.push(warning.notice());
        }

        self.latch.data_ready();
        if self.latch.has_fired() {
            self.populate_markers(map);
        }

        if let Some(id) = self.pending_deep_link.take() {
            logging::info(Component::Panel, Some(&id), "Opening deep link");
            self.open(&id, false);
        }
    }

    pub fn on_map_ready(&mut self, map: &mut dyn MapProvider) {
        if self.latch.map_ready() {
            self.populate_markers(map);
        }
    }

    fn populate_markers(&mut self, map: &mut dyn MapProvider) {
        let pins = render::build_pins(self.store.iter());
        logging::info(
            Component::Map,
            None,
            &format!("Placing {} pins for {} sources", pins.len(), self.store.len()),
        );
        self.markers.populate(map, pins);
        self.refresh_visibility(map);
    }

    // -----------------------------------------------------------------------
    // Detail panel
    // -----------------------------------------------------------------------

    /// Opens the panel on `id` and pushes a history entry. Returns `false`
    /// (with a notice) for unknown ids.
    pub fn open_source(&mut self, id: &str) -> bool {
        self.open(id, true)
    }

    fn open(&mut self, id: &str, push_history: bool) -> bool {
        let record = match self.store.get(id) {
            Ok(record) => record,
            Err(err) => {
                logging::warn(Component::Panel, Some(id), &err.to_string());
                self.notices.push(err.notice());
                return false;
            }
        };

        let title = render::detail::title(record);
        let body = match render::render_detail(record, &self.render_options) {
            Ok(body) => body,
            Err(err) => {
                logging::error(Component::Render, Some(id), &err.to_string());
                render::render_error_panel(id, &err.to_string())
            }
        };
        self.panel.open(&mut self.page, id, title, body, push_history);
        true
    }

    /// Closes the panel through the close button.
    pub fn close_panel(&mut self) -> bool {
        self.panel.close(&mut self.page, true)
    }

    /// Escape closes an open panel; every other key is ignored.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close_panel()
    }

    /// A click on the backdrop closes the panel; a click inside it does not.
    pub fn handle_overlay_click(&mut self, target: ClickTarget) -> bool {
        target == ClickTarget::Backdrop && self.close_panel()
    }

    /// Back/forward navigation: the panel follows the `source` parameter of
    /// the address navigated to, without pushing history of its own.
    pub fn handle_pop_state(&mut self, url: Url) {
        let wanted = panel::source_param(&url);
        self.page.navigate_to(url);

        match wanted {
            Some(id) if !self.latch.is_data_ready() => self.pending_deep_link = Some(id),
            Some(id) => {
                if self.panel.current_source() != Some(id.as_str()) && !self.open(&id, false) {
                    self.panel.close(&mut self.page, false);
                }
            }
            None => {
                self.pending_deep_link = None;
                self.panel.close(&mut self.page, false);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Map
    // -----------------------------------------------------------------------

    /// A pin was clicked: its popup opens, every other one closes.
    pub fn handle_pin_click(&mut self, id: &str, map: &mut dyn MapProvider) -> bool {
        self.markers.select(map, id)
    }

    /// Closes the panel, centres the map on the source and opens its popup.
    pub fn show_on_map(&mut self, id: &str, map: &mut dyn MapProvider) -> bool {
        let position = match self.source_position(id) {
            Ok(position) => position,
            Err(err) => {
                logging::warn(Component::Map, Some(id), &err.to_string());
                self.notices.push(err.notice());
                return false;
            }
        };

        self.close_panel();
        map.center_on(position, SOURCE_ZOOM);
        self.markers.select(map, id);
        true
    }

    fn source_position(&self, id: &str) -> Result<Coordinates, SourcesError> {
        let record = self.store.get(id)?;
        record.coordinates.ok_or_else(|| SourcesError::RenderFailure {
            id: id.to_string(),
            message: "missing or non-numeric coordinates".to_string(),
        })
    }

    pub fn apply_filter(&mut self, filter: StatusFilter, map: &mut dyn MapProvider) {
        self.filter = filter;
        self.refresh_visibility(map);
    }

    fn refresh_visibility(&self, map: &mut dyn MapProvider) {
        for pin in self.markers.pins() {
            let status = self
                .store
                .get(&pin.source_id)
                .map(|r| r.status())
                .unwrap_or_default();
            map.set_pin_visible(&pin.source_id, self.filter.shows(status));
        }
    }

    // -----------------------------------------------------------------------
    // Outbound actions
    // -----------------------------------------------------------------------

    pub fn share(&mut self, id: &str, capability: ShareCapability) -> Option<ShareDelivery> {
        let record = lookup(&self.store, &mut self.notices, id)?;
        let payload = actions::share_payload(record, &self.config.base_url);
        Some(actions::share_delivery(payload, capability))
    }

    pub fn report_problem(&mut self, id: &str) -> Option<ProblemReport> {
        let record = lookup(&self.store, &mut self.notices, id)?;
        Some(actions::problem_report(record, &self.config.report_recipient))
    }

    /// Routes a clicked `data-action` button to its handler.
    pub fn dispatch(
        &mut self,
        action: Action,
        id: &str,
        map: &mut dyn MapProvider,
        capability: ShareCapability,
    ) -> ActionEffect {
        match action {
            Action::Open if self.open_source(id) => ActionEffect::Done,
            Action::ShowOnMap if self.show_on_map(id, map) => ActionEffect::Done,
            Action::Share => self
                .share(id, capability)
                .map_or(ActionEffect::Ignored, ActionEffect::Share),
            Action::ReportProblem => self
                .report_problem(id)
                .map_or(ActionEffect::Ignored, |r| ActionEffect::Mail(r.mailto())),
            Action::Open | Action::ShowOnMap => ActionEffect::Ignored,
        }
    }

    // -----------------------------------------------------------------------
    // Geolocation
    // -----------------------------------------------------------------------

    /// Reuses the last fix while it is within the maximum age.
    pub fn request_position(&self, now: DateTime<Utc>) -> LocateRequest {
        match self.positions.fresh_at(self.geolocation.maximum_age_secs, now) {
            Some(position) => LocateRequest::Cached(position),
            None => LocateRequest::Ask(self.geolocation),
        }
    }

    /// Applies the answer to a locate request. Single attempt; failures
    /// only produce a notice.
    pub fn locate_user(
        &mut self,
        result: Result<Position, PositionError>,
        map: &mut dyn MapProvider,
    ) -> Option<Coordinates> {
        match result {
            Ok(position) => {
                self.positions.remember(position);
                map.center_on(position.coordinates, USER_ZOOM);
                map.show_user_position(position.coordinates);
                logging::info(Component::Geo, None, "User located");
                self.notices.push(Notice::success("Position found!"));
                Some(position.coordinates)
            }
            Err(err) => {
                let err = SourcesError::from(err);
                logging::warn(Component::Geo, None, &err.to_string());
                self.notices.push(err.notice());
                None
            }
        }
    }
}

/// Looks up `id`, queueing a notice when it is unknown.
fn lookup<'a>(
    store: &'a SourceStore,
    notices: &mut Vec<Notice>,
    id: &str,
) -> Option<&'a SourceRecord> {
    match store.get(id) {
        Ok(record) => Some(record),
        Err(err) => {
            logging::warn(Component::System, Some(id), &err.to_string());
            notices.push(err.notice());
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

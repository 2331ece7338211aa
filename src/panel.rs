/// Detail panel state and its reflection in the page.
///
/// Two states only: closed and open on one source. Opening pushes a history
/// entry carrying `?source=<id>` and locks background scrolling; closing
/// removes the parameter and unlocks scrolling. The address bar is cosmetic
/// state for deep links and back navigation, never a store.

use reqwest::Url;

use crate::model::SourcesError;

/// Query parameter naming the open source.
pub const SOURCE_PARAM: &str = "source";

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The parts of the page the panel touches: address bar, history and body
/// scrolling.
#[derive(Debug, Clone)]
pub struct PageState {
    url: Url,
    history: Vec<Url>,
    scroll_locked: bool,
}

impl PageState {
    pub fn new(url: &str) -> Result<Self, SourcesError> {
        let url = Url::parse(url)
            .map_err(|e| SourcesError::Config(format!("invalid page URL '{}': {}", url, e)))?;
        Ok(PageState { url, history: Vec::new(), scroll_locked: false })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The `source` query value of the current address, if any.
    pub fn source_param(&self) -> Option<String> {
        source_param(&self.url)
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// History entries pushed during this session, oldest first.
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    /// Replaces the current address without pushing a history entry, as a
    /// back/forward navigation does.
    pub fn navigate_to(&mut self, url: Url) {
        self.url = url;
    }

    fn push_with_source(&mut self, source_id: Option<&str>) {
        let mut url = self.url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != SOURCE_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() && source_id.is_none() {
            url.set_query(None);
        } else {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            if let Some(id) = source_id {
                pairs.append_pair(SOURCE_PARAM, id);
            }
        }

        self.history.push(url.clone());
        self.url = url;
    }
}

/// Reads the `source` query value from an address.
pub fn source_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == SOURCE_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open { source_id: String },
}

/// The single on-page detail container.
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    state: PanelState,
    title: String,
    body: String,
}

impl DetailPanel {
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    pub fn current_source(&self) -> Option<&str> {
        match &self.state {
            PanelState::Open { source_id } => Some(source_id),
            PanelState::Closed => None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Shows `body` for `source_id`. With `push_history` set, the address
    /// gains `?source=<id>` through a new history entry; deep links and
    /// back navigation already carry it and pass `false`.
    pub fn open(
        &mut self,
        page: &mut PageState,
        source_id: &str,
        title: String,
        body: String,
        push_history: bool,
    ) {
        if push_history {
            page.push_with_source(Some(source_id));
        }
        page.scroll_locked = true;
        self.title = title;
        self.body = body;
        self.state = PanelState::Open { source_id: source_id.to_string() };
    }

    /// Hides the panel. Returns `false` when it was already closed.
    pub fn close(&mut self, page: &mut PageState, push_history: bool) -> bool {
        if !self.is_open() {
            return false;
        }
        if push_history {
            page.push_with_source(None);
        }
        page.scroll_locked = false;
        self.title.clear();
        self.body.clear();
        self.state = PanelState::Closed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageState {
        PageState::new("https://sources-vivantes.fr/?lang=fr").unwrap()
    }

    #[test]
    fn test_open_pushes_source_param_and_locks_scroll() {
        let mut page = page();
        let mut panel = DetailPanel::default();
        panel.open(&mut page, "demo", "Demo".into(), "<div></div>".into(), true);

        assert!(panel.is_open());
        assert_eq!(panel.current_source(), Some("demo"));
        assert_eq!(page.source_param().as_deref(), Some("demo"));
        assert!(page.url().contains("lang=fr"), "other parameters survive: {}", page.url());
        assert!(page.scroll_locked());
        assert_eq!(page.history().len(), 1);
    }

    #[test]
    fn test_close_removes_param_and_restores_scroll() {
        let mut page = page();
        let mut panel = DetailPanel::default();
        panel.open(&mut page, "demo", "Demo".into(), String::new(), true);
        assert!(panel.close(&mut page, true));

        assert_eq!(*panel.state(), PanelState::Closed);
        assert_eq!(page.source_param(), None);
        assert_eq!(page.url(), "https://sources-vivantes.fr/?lang=fr");
        assert!(!page.scroll_locked());
        assert_eq!(page.history().len(), 2);
    }

    #[test]
    fn test_close_without_other_params_leaves_no_query() {
        let mut page = PageState::new("https://sources-vivantes.fr/").unwrap();
        let mut panel = DetailPanel::default();
        panel.open(&mut page, "demo", String::new(), String::new(), true);
        panel.close(&mut page, true);
        assert_eq!(page.url(), "https://sources-vivantes.fr/");
    }

    #[test]
    fn test_closing_a_closed_panel_is_a_no_op() {
        let mut page = page();
        let mut panel = DetailPanel::default();
        assert!(!panel.close(&mut page, true));
        assert!(page.history().is_empty());
    }

    #[test]
    fn test_reopening_replaces_the_source() {
        let mut page = page();
        let mut panel = DetailPanel::default();
        panel.open(&mut page, "demo", String::new(), String::new(), true);
        panel.open(&mut page, "boulou_tursac", String::new(), String::new(), true);
        assert_eq!(page.source_param().as_deref(), Some("boulou_tursac"));
        assert_eq!(page.url().matches("source=").count(), 1);
    }

    #[test]
    fn test_empty_source_param_is_absent() {
        let url = Url::parse("https://sources-vivantes.fr/?source=").unwrap();
        assert_eq!(source_param(&url), None);
    }
}

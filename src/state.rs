//! Dashboard state and the events that change it
//!
//! All mutable state of a dashboard session lives in [`AppState`]. The
//! presentation layer never touches it directly: it turns user input into a
//! [`UiEvent`], hands it to [`AppState::update`], and redraws from
//! [`AppState::view`] when the returned [`Outcome`] asks for it. Each event
//! runs to completion before the next one is looked at.
//!
//! The state also round-trips through the address bar as
//! `?show=<name>&consider=<x.x>&mustWatch=<y.y>` so a view can be bookmarked.

use crate::feed::records::parse_float;
use crate::rating::{self, ShowView, Slider, SortColumn, SortState, Thresholds};
use crate::rating::tier::{THRESHOLD_MAX, THRESHOLD_MIN};
use crate::shows::ShowIndex;
use serde::{Deserialize, Serialize};

/// One discrete user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A show was picked from the dropdown or typed in full
    ShowSelected { name: String },
    /// The clear button next to the search box
    ShowCleared,
    /// A threshold slider moved
    ThresholdChanged { slider: Slider, value: f64 },
    /// A threshold slider was let go
    ThresholdReleased,
    /// A must-watch table header was clicked
    SortRequested { column: SortColumn },
    /// The search box text changed
    SearchInput { term: String },
}

/// What the presentation layer has to do after an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    /// Redraw from [`AppState::view`] (a `None` view means clear the panels)
    pub rerender: bool,
    /// New query string for the address bar, without the leading `?`
    pub url: Option<String>,
    /// Dropdown entries to show
    pub suggestions: Option<Vec<String>>,
}

/// The address-bar parameters, both read at startup and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consider: Option<String>,
    #[serde(default, rename = "mustWatch", skip_serializing_if = "Option::is_none")]
    pub must_watch: Option<String>,
}

impl QueryParams {
    /// Parse a query string. A repeated key keeps its first value, as the
    /// browser's `URLSearchParams.get` does; malformed input yields no parameters.
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring malformed query string");
            Vec::new()
        });

        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "show" => &mut params.show,
                "consider" => &mut params.consider,
                "mustWatch" => &mut params.must_watch,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub thresholds: Thresholds,
    pub sort: SortState,
    pub current_show: Option<String>,
    /// Current search box text
    pub search: String,
    /// Entry animation is suppressed while a slider is being dragged
    pub animate: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            sort: SortState::default(),
            current_show: None,
            search: String::new(),
            animate: true,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply startup parameters.
    ///
    /// Thresholds outside 5.0–9.5 (or unparseable) are ignored. If both are
    /// given out of order, must-watch is pushed 0.1 above consider. An unknown
    /// show is ignored and nothing gets selected.
    pub fn apply_query(&mut self, index: &ShowIndex, query: &str) {
        let params = QueryParams::parse(query);

        let mut consider = self.thresholds.consider();
        let mut must_watch = self.thresholds.must_watch();

        if let Some(value) = params.consider.as_deref().map(parse_float) {
            if Thresholds::in_range(value) {
                consider = value;
            } else {
                tracing::debug!(value, "consider parameter out of range");
            }
        }
        if let Some(value) = params.must_watch.as_deref().map(parse_float) {
            if Thresholds::in_range(value) {
                must_watch = value;
            } else {
                tracing::debug!(value, "mustWatch parameter out of range");
            }
        }
        self.thresholds = Thresholds::new(consider, must_watch);

        if let Some(name) = params.show.as_deref().filter(|s| !s.is_empty()) {
            match index.find(name) {
                Some(found) => self.select(found),
                None => tracing::debug!(show = %name, "show parameter not in index"),
            }
        }
    }

    /// Address-bar form of the current state.
    pub fn query_string(&self) -> String {
        let params = QueryParams {
            show: self.current_show.clone(),
            consider: Some(format!("{:.1}", self.thresholds.consider())),
            must_watch: Some(format!("{:.1}", self.thresholds.must_watch())),
        };
        serde_urlencoded::to_string(&params).unwrap_or_default()
    }

    pub fn update(&mut self, index: &ShowIndex, event: UiEvent) -> Outcome {
        tracing::trace!(?event, "ui event");

        match event {
            UiEvent::ShowSelected { name } => match index.find(&name) {
                Some(found) => {
                    self.select(found);
                    self.changed()
                }
                None => {
                    tracing::debug!(show = %name, "selected show not in index");
                    Outcome::default()
                }
            },

            UiEvent::ShowCleared => {
                self.current_show = None;
                self.search.clear();
                Outcome {
                    rerender: true,
                    url: Some(self.query_string()),
                    suggestions: Some(owned(index.search(""))),
                }
            }

            UiEvent::ThresholdChanged { slider, value } => {
                if !value.is_finite() {
                    return Outcome::default();
                }
                self.thresholds
                    .set(slider, value.clamp(THRESHOLD_MIN, THRESHOLD_MAX));
                self.animate = false;

                if self.current_show.is_some() {
                    self.changed()
                } else {
                    Outcome::default()
                }
            }

            UiEvent::ThresholdReleased => {
                self.animate = true;
                Outcome::default()
            }

            UiEvent::SortRequested { column } => {
                self.sort = self.sort.toggle(column);
                Outcome {
                    rerender: self.current_show.is_some(),
                    ..Outcome::default()
                }
            }

            UiEvent::SearchInput { term } => {
                let suggestions = owned(index.search(&term));
                self.search = term;
                Outcome {
                    suggestions: Some(suggestions),
                    ..Outcome::default()
                }
            }
        }
    }

    /// Render the current show, if one is selected and still in the index.
    pub fn view(&self, index: &ShowIndex) -> Option<ShowView> {
        let name = self.current_show.as_deref()?;
        let episodes = index.get(name)?;
        Some(rating::display_show(name, episodes, &self.thresholds, self.sort))
    }

    fn select(&mut self, name: &str) {
        self.current_show = Some(name.to_string());
        self.search = name.to_string();
        self.sort = SortState::default();
        self.animate = true;
    }

    fn changed(&self) -> Outcome {
        Outcome {
            rerender: true,
            url: Some(self.query_string()),
            suggestions: None,
        }
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

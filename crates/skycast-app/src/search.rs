//! Search and location orchestration.
//!
//! Owns the flow from a query (or a position fix) through geocoding,
//! preference updates, the concurrent weather fetch, and the render
//! pipeline. All fetch-layer errors stop here; callers only ever see a
//! terminal outcome carrying view fragments.

use skycast_weather::{Coordinates, LocationSource, Unit, WeatherClient};

use crate::prefs::PrefsStore;
use crate::view::{
    render_current, render_error, render_forecast, render_recent_chips, select_forecast_days,
    CurrentView, ErrorView, ForecastTile, RecentChip,
};

const NO_MATCH_MSG: &str = "No matching city found. Try \"Paris\" or \"Tokyo\".";
const GENERIC_ERROR_MSG: &str = "Something went wrong. Check your API key and network.";
const GEO_UNSUPPORTED_MSG: &str = "Location lookup is not available on this system.";
const GEO_DENIED_MSG: &str = "Could not get your location.";

/// Everything a successful lookup renders
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub current: CurrentView,
    pub forecast: Vec<ForecastTile>,
    pub recent: Vec<RecentChip>,
}

/// Terminal state of one search request
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Blank input; silently ignored.
    Idle,
    /// Geocoding returned zero matches; distinct from a network failure.
    NoMatch(ErrorView),
    /// Network or parse failure somewhere in the pipeline; cause is logged,
    /// the message stays generic.
    Failure(ErrorView),
    Success(Dashboard),
}

/// Terminal state of one location-driven lookup
#[derive(Debug, Clone)]
pub enum LocateOutcome {
    /// No location capability; nothing was fetched.
    Unavailable(String),
    /// Position acquisition failed or was denied; nothing was fetched.
    Denied(String),
    Failure(ErrorView),
    Success(Dashboard),
}

/// Application orchestrator.
///
/// Runs one flow at a time (`&mut self`), so overlapping searches cannot
/// interleave and a stale response can never overwrite a newer one.
pub struct WeatherApp {
    client: WeatherClient,
    prefs: PrefsStore,
    /// Coordinates of the last successful lookup; lets the unit toggle
    /// refetch without re-geocoding.
    last_coords: Option<Coordinates>,
}

impl WeatherApp {
    pub fn new(client: WeatherClient, prefs: PrefsStore) -> Self {
        Self {
            client,
            prefs,
            last_coords: None,
        }
    }

    pub fn prefs(&self) -> &PrefsStore {
        &self.prefs
    }

    /// Search flow: geocode the query, persist the resolved label, then
    /// fetch and render both panels.
    pub async fn search(&mut self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Idle;
        }

        let place = match self.client.geocode(query).await {
            Ok(Some(place)) => place,
            Ok(None) => return SearchOutcome::NoMatch(render_error(NO_MATCH_MSG)),
            Err(e) => {
                tracing::error!("Geocoding '{}' failed: {}", query, e);
                return SearchOutcome::Failure(render_error(GENERIC_ERROR_MSG));
            }
        };

        self.remember_city(&place.display_label());

        match self.load_all(place.coordinates()).await {
            Ok(dashboard) => SearchOutcome::Success(dashboard),
            Err(view) => SearchOutcome::Failure(view),
        }
    }

    /// Startup entry point: re-run the stored last city.
    pub async fn search_last(&mut self) -> SearchOutcome {
        let city = self.prefs.last_city().to_string();
        self.search(&city).await
    }

    /// Switch the temperature unit.
    ///
    /// When coordinates from a prior successful lookup exist the data is
    /// refetched under the new unit without re-geocoding; otherwise only the
    /// stored preference changes and `None` is returned.
    pub async fn set_unit(&mut self, unit: Unit) -> Option<SearchOutcome> {
        if let Err(e) = self.prefs.set_unit(unit) {
            tracing::warn!("Failed to persist unit preference: {}", e);
        }

        let coords = self.last_coords?;
        Some(match self.load_all(coords).await {
            Ok(dashboard) => SearchOutcome::Success(dashboard),
            Err(view) => SearchOutcome::Failure(view),
        })
    }

    /// Location flow: fetch weather for the position fix first, then try a
    /// reverse geocode purely for a friendly label.
    pub async fn locate<L: LocationSource>(&mut self, source: &L) -> LocateOutcome {
        if !source.is_available() {
            return LocateOutcome::Unavailable(GEO_UNSUPPORTED_MSG.to_string());
        }

        let coords = match source.current_position().await {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!("Position acquisition failed: {}", e);
                return LocateOutcome::Denied(GEO_DENIED_MSG.to_string());
            }
        };

        let mut dashboard = match self.load_all(coords).await {
            Ok(dashboard) => dashboard,
            Err(view) => return LocateOutcome::Failure(view),
        };

        // Label is cosmetic; the weather data above stands either way.
        let label = match self.client.reverse_geocode(coords.lat, coords.lon).await {
            Some(place) => place.display_label(),
            None => format!("{:.2}, {:.2}", coords.lat, coords.lon),
        };
        self.remember_city(&label);
        dashboard.recent = render_recent_chips(self.prefs.recent_cities());

        LocateOutcome::Success(dashboard)
    }

    fn remember_city(&mut self, label: &str) {
        if let Err(e) = self.prefs.set_last_city(label) {
            tracing::warn!("Failed to persist last city: {}", e);
        }
        if let Err(e) = self.prefs.push_recent(label) {
            tracing::warn!("Failed to persist recent cities: {}", e);
        }
    }

    async fn load_all(&mut self, coords: Coordinates) -> Result<Dashboard, ErrorView> {
        self.last_coords = Some(coords);
        let unit = self.prefs.unit();

        let (current, entries) = self
            .client
            .fetch_current_and_forecast(coords, unit)
            .await
            .map_err(|e| {
                tracing::error!("Weather fetch failed: {}", e);
                render_error(e.user_message())
            })?;

        let days = select_forecast_days(&entries, current.utc_offset_secs);

        Ok(Dashboard {
            current: render_current(&current, unit),
            forecast: render_forecast(&days),
            recent: render_recent_chips(self.prefs.recent_cities()),
        })
    }
}

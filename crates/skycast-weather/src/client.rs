//! OpenWeather API client.
//!
//! Three endpoints: direct geocoding, reverse geocoding, and the
//! current-conditions/forecast pair. The pair is fetched concurrently and
//! both requests must succeed.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{
    ApiError, Coordinates, CurrentConditions, FetchError, ForecastEntry, GeoResult, Unit,
};

const API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Icon code used when the API omits one.
const DEFAULT_ICON: &str = "01d";

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    api_base: String,
    geo_base: String,
}

impl WeatherClient {
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Self::with_base_urls(api_key, API_BASE, GEO_BASE)
    }

    /// Client pointing at alternate hosts; used by integration tests.
    pub fn with_base_urls(
        api_key: &str,
        api_base: &str,
        geo_base: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
            geo_base: geo_base.to_string(),
        })
    }

    /// Resolve a free-text place name to coordinates.
    ///
    /// Returns `Ok(None)` when the API has no match for the query; that is a
    /// normal outcome, not a failure. The caller is responsible for trimming
    /// the query and rejecting empty input.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, query: &str) -> Result<Option<GeoResult>, ApiError> {
        let url = format!(
            "{}/direct?q={}&limit=1&appid={}",
            self.geo_base,
            urlencoding::encode(query),
            self.api_key,
        );

        let places: Vec<GeoPlace> = self.get_json(&url).await?;
        Ok(places.into_iter().next().map(GeoResult::from))
    }

    /// Resolve coordinates to a place, purely for display labels.
    ///
    /// Every failure is swallowed with a debug log; the caller falls back to
    /// raw coordinates and already-rendered weather data is never affected.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<GeoResult> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&limit=1&appid={}",
            self.geo_base, lat, lon, self.api_key,
        );

        match self.get_json::<Vec<GeoPlace>>(&url).await {
            Ok(places) => places.into_iter().next().map(GeoResult::from),
            Err(e) => {
                tracing::debug!("Reverse geocode failed: {}", e);
                None
            }
        }
    }

    /// Fetch current conditions and the 3-hourly forecast concurrently.
    ///
    /// Both requests must succeed; the first failure is reported, tagged by
    /// endpoint so logs can attribute it.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_and_forecast(
        &self,
        coords: Coordinates,
        unit: Unit,
    ) -> Result<(CurrentConditions, Vec<ForecastEntry>), FetchError> {
        let (current, forecast) =
            tokio::join!(self.current(coords, unit), self.forecast(coords, unit));

        let current = current.map_err(FetchError::Current)?;
        let forecast = forecast.map_err(FetchError::Forecast)?;
        Ok((current, forecast))
    }

    async fn current(
        &self,
        coords: Coordinates,
        unit: Unit,
    ) -> Result<CurrentConditions, ApiError> {
        let url = format!(
            "{}/weather?lat={}&lon={}&units={}&appid={}",
            self.api_base,
            coords.lat,
            coords.lon,
            unit.api_value(),
            self.api_key,
        );

        let payload: CurrentPayload = self.get_json(&url).await?;
        Ok(payload.into())
    }

    async fn forecast(
        &self,
        coords: Coordinates,
        unit: Unit,
    ) -> Result<Vec<ForecastEntry>, ApiError> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&units={}&appid={}",
            self.api_base,
            coords.lat,
            coords.lon,
            unit.api_value(),
            self.api_key,
        );

        let payload: ForecastPayload = self.get_json(&url).await?;
        Ok(payload
            .list
            .unwrap_or_default()
            .into_iter()
            .map(ForecastEntry::from)
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

// Wire payloads. Every field the API might omit is an Option here; defaults
// are applied once, in the conversions below.

#[derive(Debug, Deserialize)]
struct GeoPlace {
    name: Option<String>,
    lat: f64,
    lon: f64,
    state: Option<String>,
    country: Option<String>,
}

impl From<GeoPlace> for GeoResult {
    fn from(place: GeoPlace) -> Self {
        Self {
            lat: place.lat,
            lon: place.lon,
            name: place.name.unwrap_or_default(),
            state: place.state,
            country: place.country,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: Option<String>,
    sys: Option<SysPayload>,
    coord: Option<CoordPayload>,
    main: Option<MainPayload>,
    weather: Option<Vec<ConditionPayload>>,
    wind: Option<WindPayload>,
    dt: Option<i64>,
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SysPayload {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoordPayload {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    main: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    speed: Option<f64>,
}

impl From<CurrentPayload> for CurrentConditions {
    fn from(payload: CurrentPayload) -> Self {
        let main = payload.main.unwrap_or(MainPayload {
            temp: None,
            feels_like: None,
            humidity: None,
            pressure: None,
        });
        let condition = payload
            .weather
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or(ConditionPayload {
                main: None,
                icon: None,
            });
        let coord = payload.coord.unwrap_or(CoordPayload {
            lat: None,
            lon: None,
        });

        Self {
            name: payload.name.unwrap_or_default(),
            country: payload.sys.and_then(|s| s.country),
            coordinates: Coordinates {
                lat: coord.lat.unwrap_or(0.0),
                lon: coord.lon.unwrap_or(0.0),
            },
            temperature: main.temp,
            feels_like: main.feels_like,
            humidity: main.humidity.map(|h| h.round() as u8).unwrap_or(0),
            wind_speed: payload.wind.and_then(|w| w.speed).unwrap_or(0.0),
            pressure: main.pressure.map(|p| p.round() as u32).unwrap_or(0),
            condition_code: condition.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            condition_text: condition.main.unwrap_or_default(),
            observed_at: payload.dt.unwrap_or(0),
            utc_offset_secs: payload.timezone.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    list: Option<Vec<ForecastItemPayload>>,
}

#[derive(Debug, Deserialize)]
struct ForecastItemPayload {
    dt: Option<i64>,
    main: Option<ForecastMainPayload>,
    weather: Option<Vec<ConditionPayload>>,
}

#[derive(Debug, Deserialize)]
struct ForecastMainPayload {
    temp: Option<f64>,
}

impl From<ForecastItemPayload> for ForecastEntry {
    fn from(item: ForecastItemPayload) -> Self {
        let condition = item
            .weather
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or(ConditionPayload {
                main: None,
                icon: None,
            });

        Self {
            timestamp: item.dt.unwrap_or(0),
            temperature: item.main.and_then(|m| m.temp),
            condition_code: condition.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            condition_text: condition.main.unwrap_or_default(),
        }
    }
}

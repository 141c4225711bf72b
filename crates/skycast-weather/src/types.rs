use serde::{Deserialize, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Value of the `units` query parameter on the weather endpoints.
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Wind speed label shown next to the wind reading.
    pub fn wind_label(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }

    /// Human name of the temperature scale.
    pub fn scale_name(self) -> &'static str {
        match self {
            Self::Metric => "Celsius",
            Self::Imperial => "Fahrenheit",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(format!(
                "unknown unit '{other}', expected 'metric' or 'imperial'"
            )),
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A single geocoding match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoResult {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl GeoResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }

    /// Display label built from the present name parts, e.g. "Paris, FR"
    /// or "Portland, Oregon, US".
    pub fn display_label(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            parts.push(state);
        }
        if let Some(country) = self.country.as_deref().filter(|c| !c.is_empty()) {
            parts.push(country);
        }
        parts.join(", ")
    }
}

/// Current weather conditions for one location.
///
/// Readings the API may omit are either `Option` (temperatures, which render
/// as a placeholder) or carry a documented zero default (humidity, wind,
/// pressure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    /// Relative humidity in percent; 0 when the API omits it.
    pub humidity: u8,
    /// Wind speed in the requested unit system; 0.0 when omitted.
    pub wind_speed: f64,
    /// Pressure in hPa; 0 when omitted.
    pub pressure: u32,
    /// OpenWeather icon code, e.g. "01d"; defaults to "01d" when omitted.
    pub condition_code: String,
    /// Short condition text, e.g. "Rain"; empty when omitted.
    pub condition_text: String,
    /// Unix timestamp of the observation.
    pub observed_at: i64,
    /// Seconds to add to a Unix timestamp for local wall-clock time.
    pub utc_offset_secs: i64,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temperature: Option<f64>,
    pub condition_code: String,
    pub condition_text: String,
}

/// URL of the condition icon on the OpenWeather image host.
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location error: {0}")]
    Other(String),
}

/// A single failed API request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed response: {0}")]
    Parse(String),
}

/// Failure of the joint current+forecast fetch.
///
/// The two variants exist to attribute the failure in logs; user-facing
/// handling treats them identically.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Current conditions request failed: {0}")]
    Current(#[source] ApiError),
    #[error("Forecast request failed: {0}")]
    Forecast(#[source] ApiError),
}

impl FetchError {
    /// User-friendly message for UI display; deliberately generic.
    pub fn user_message(&self) -> &'static str {
        "Something went wrong. Check your API key and network."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_api_values() {
        assert_eq!(Unit::Metric.api_value(), "metric");
        assert_eq!(Unit::Imperial.api_value(), "imperial");
    }

    #[test]
    fn test_unit_wind_labels() {
        assert_eq!(Unit::Metric.wind_label(), "m/s");
        assert_eq!(Unit::Imperial.wind_label(), "mph");
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("metric".parse::<Unit>().unwrap(), Unit::Metric);
        assert_eq!("IMPERIAL".parse::<Unit>().unwrap(), Unit::Imperial);
        assert!("kelvin".parse::<Unit>().is_err());
    }

    #[test]
    fn test_display_label_full() {
        let place = GeoResult {
            lat: 45.5,
            lon: -122.7,
            name: "Portland".to_string(),
            state: Some("Oregon".to_string()),
            country: Some("US".to_string()),
        };
        assert_eq!(place.display_label(), "Portland, Oregon, US");
    }

    #[test]
    fn test_display_label_skips_absent_parts() {
        let place = GeoResult {
            lat: 48.85,
            lon: 2.35,
            name: "Paris".to_string(),
            state: None,
            country: Some("FR".to_string()),
        };
        assert_eq!(place.display_label(), "Paris, FR");

        let bare = GeoResult {
            lat: 0.0,
            lon: 0.0,
            name: "Null Island".to_string(),
            state: Some(String::new()),
            country: None,
        };
        assert_eq!(bare.display_label(), "Null Island");
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(
            icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[test]
    fn test_fetch_error_user_message_is_uniform() {
        let current = FetchError::Current(ApiError::Parse("bad json".into()));
        let forecast = FetchError::Forecast(ApiError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        ));
        assert_eq!(current.user_message(), forecast.user_message());
    }
}

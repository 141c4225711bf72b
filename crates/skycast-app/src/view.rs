//! Pure view-model builders for the weather panels.
//!
//! Nothing here touches the network or any output device; the functions
//! turn fetched records into renderable fragments so the pipeline can be
//! unit tested on its own.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use skycast_weather::{icon_url, CurrentConditions, ForecastEntry, Unit};

/// Placeholder shown for an absent temperature reading.
pub const TEMP_PLACEHOLDER: &str = "\u{2014}";

/// Format a temperature as a rounded integer with a degree suffix.
///
/// Rounding is round-half-away-from-zero (`f64::round`), cast through `i64`
/// so `-0.4` renders as `0°` rather than `-0°`.
pub fn fmt_temp(temp: Option<f64>) -> String {
    match temp {
        Some(t) => format!("{}°", t.round() as i64),
        None => TEMP_PLACEHOLDER.to_string(),
    }
}

/// Current-conditions panel fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    /// "Paris, FR" or just the city name when the country is absent.
    pub city_label: String,
    pub icon_url: String,
    /// Alt text for the icon; the condition description.
    pub icon_alt: String,
    pub temperature: String,
    pub feels_like: String,
    pub condition: String,
    pub humidity_pct: u8,
    /// Rounded speed plus unit label, e.g. "4 m/s".
    pub wind: String,
    pub pressure_hpa: u32,
    /// Observation time in the location's wall clock.
    pub observed_local: String,
    pub lat: String,
    pub lon: String,
    pub scale_name: &'static str,
}

pub fn render_current(current: &CurrentConditions, unit: Unit) -> CurrentView {
    let city_label = match current.country.as_deref() {
        Some(country) if !country.is_empty() => format!("{}, {}", current.name, country),
        _ => current.name.clone(),
    };

    let observed = local_datetime(current.observed_at, current.utc_offset_secs);

    CurrentView {
        city_label,
        icon_url: icon_url(&current.condition_code),
        icon_alt: current.condition_text.clone(),
        temperature: fmt_temp(current.temperature),
        feels_like: fmt_temp(current.feels_like),
        condition: current.condition_text.clone(),
        humidity_pct: current.humidity,
        wind: format!("{} {}", current.wind_speed.round() as i64, unit.wind_label()),
        pressure_hpa: current.pressure,
        observed_local: observed.format("%a, %b %-d %H:%M").to_string(),
        lat: format!("{:.2}", current.coordinates.lat),
        lon: format!("{:.2}", current.coordinates.lon),
        scale_name: unit.scale_name(),
    }
}

/// One representative forecast entry per local calendar day
#[derive(Debug, Clone)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub entry: ForecastEntry,
}

/// Pick at most five daily summaries from 3-hourly samples.
///
/// Entries are grouped by the location's calendar date (computed from the
/// supplied UTC offset, not the viewer's timezone). Per day the entry whose
/// local hour is closest to noon wins; ties keep the earliest-scanned entry.
pub fn select_forecast_days(
    entries: &[ForecastEntry],
    utc_offset_secs: i64,
) -> Vec<ForecastDay> {
    let mut by_day: BTreeMap<NaiveDate, (u32, ForecastEntry)> = BTreeMap::new();

    for entry in entries {
        let local = local_datetime(entry.timestamp, utc_offset_secs);
        let date = local.date_naive();
        let score = (12 - i64::from(local.hour())).unsigned_abs() as u32;

        match by_day.get(&date) {
            Some((best, _)) if *best <= score => {}
            _ => {
                by_day.insert(date, (score, entry.clone()));
            }
        }
    }

    by_day
        .into_iter()
        .take(5)
        .map(|(date, (_, entry))| ForecastDay { date, entry })
        .collect()
}

/// One forecast strip tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastTile {
    /// Weekday/month/day label, e.g. "Mon, Mar 2".
    pub label: String,
    pub icon_url: String,
    pub temperature: String,
    pub condition: String,
}

pub fn render_forecast(days: &[ForecastDay]) -> Vec<ForecastTile> {
    days.iter()
        .map(|day| ForecastTile {
            label: day.date.format("%a, %b %-d").to_string(),
            icon_url: icon_url(&day.entry.condition_code),
            temperature: fmt_temp(day.entry.temperature),
            condition: day.entry.condition_text.clone(),
        })
        .collect()
}

/// Recent-city chip; the label doubles as the query that re-enters search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentChip {
    pub label: String,
}

pub fn render_recent_chips(cities: &[String]) -> Vec<RecentChip> {
    cities
        .iter()
        .map(|city| RecentChip {
            label: city.clone(),
        })
        .collect()
}

/// Error panel fragment; replaces both weather panels and clears status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
}

pub fn render_error(message: impl Into<String>) -> ErrorView {
    ErrorView {
        message: message.into(),
    }
}

fn local_datetime(timestamp: i64, utc_offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp + utc_offset_secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

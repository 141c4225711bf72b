//! Skycast command line interface.
//!
//! Maps the lookup surface onto subcommands: city search, system-location
//! lookup, the unit toggle, and the recent-city list. Running with no
//! subcommand repeats the stored last city, mirroring startup auto-load.

use clap::{Parser, Subcommand};

use skycast_app::{Config, Dashboard, LocateOutcome, PrefsStore, SearchOutcome, WeatherApp};
use skycast_weather::{SystemLocation, Unit, WeatherClient};

#[derive(Debug, Parser)]
#[command(name = "skycast")]
#[command(about = "City weather lookup: current conditions and a 5-day forecast")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up weather for a city by name
    Search {
        /// City name, e.g. "Paris" or "New York"
        city: Vec<String>,
    },
    /// Look up weather for the system location (SKYCAST_LAT/SKYCAST_LON)
    Locate,
    /// Set the preferred temperature unit
    Unit {
        /// "metric" (°C, m/s) or "imperial" (°F, mph)
        unit: String,
    },
    /// List recently searched cities
    Recent,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skycast_app::init()?;

    let cli = Cli::parse();

    let config = Config::load()?;
    if !config.is_configured() {
        anyhow::bail!(
            "No OpenWeather API key configured. Set OPENWEATHER_API_KEY or edit the config file."
        );
    }
    tracing::debug!("Configuration loaded");

    let prefs = PrefsStore::open(&Config::config_dir()?);
    let client = WeatherClient::new(&config.api_key)?;
    let mut app = WeatherApp::new(client, prefs);

    match cli.command {
        None => print_search(app.search_last().await),
        Some(Commands::Search { city }) => print_search(app.search(&city.join(" ")).await),
        Some(Commands::Locate) => print_locate(app.locate(&SystemLocation).await),
        Some(Commands::Unit { unit }) => {
            let unit: Unit = unit.parse().map_err(anyhow::Error::msg)?;
            match app.set_unit(unit).await {
                Some(outcome) => print_search(outcome),
                None => println!("Unit preference saved: {}", unit.scale_name()),
            }
        }
        Some(Commands::Recent) => {
            let cities = app.prefs().recent_cities();
            if cities.is_empty() {
                println!("No recent searches.");
            } else {
                for city in cities {
                    println!("{city}");
                }
            }
        }
    }

    Ok(())
}

fn print_search(outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Idle => {}
        SearchOutcome::Success(dashboard) => print_dashboard(&dashboard),
        SearchOutcome::NoMatch(view) | SearchOutcome::Failure(view) => {
            eprintln!("{}", view.message);
        }
    }
}

fn print_locate(outcome: LocateOutcome) {
    match outcome {
        LocateOutcome::Success(dashboard) => print_dashboard(&dashboard),
        LocateOutcome::Unavailable(msg) | LocateOutcome::Denied(msg) => eprintln!("{msg}"),
        LocateOutcome::Failure(view) => eprintln!("{}", view.message),
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    let current = &dashboard.current;

    println!("{}", current.city_label);
    println!("Updated {}", current.observed_local);
    println!(
        "  {}  feels like {}  {}",
        current.temperature, current.feels_like, current.condition
    );
    println!(
        "  Humidity: {}%  Wind: {}  Pressure: {} hPa",
        current.humidity_pct, current.wind, current.pressure_hpa
    );
    println!(
        "  Lat: {}  Lon: {}  Unit: {}",
        current.lat, current.lon, current.scale_name
    );

    if !dashboard.forecast.is_empty() {
        println!();
        for tile in &dashboard.forecast {
            println!(
                "  {:<14} {:>5}  {}",
                tile.label, tile.temperature, tile.condition
            );
        }
    }

    if !dashboard.recent.is_empty() {
        let labels: Vec<&str> = dashboard.recent.iter().map(|c| c.label.as_str()).collect();
        println!();
        println!("Recent: {}", labels.join(", "));
    }
}

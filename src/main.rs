use clap::{Parser, Subcommand};
use mrt_food::config::Settings;
use mrt_food::models::labels::{card_tags, is_known_food_type, price_tier_label, search_stats};
use mrt_food::models::{FavoriteEntry, SortMode, TravelMode};
use mrt_food::services::google::is_api_key_configured;
use mrt_food::services::{
    CachingProvider, FileStorage, GooglePlacesClient, KeyValueStorage, PlacesProvider,
    UnavailableProvider,
};
use mrt_food::session::SearchSession;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mrt-food")]
#[command(about = "Find and rank restaurants around Taipei MRT stations")]
struct Cli {
    /// Configuration file, instead of config/default.toml
    #[arg(long, env = "MRT_FOOD_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search restaurants near a station
    Search {
        station: String,
        #[arg(long)]
        radius: Option<u32>,
        /// Price preset 1-4; any other level means tiers 1-4
        #[arg(long)]
        price_level: Option<i64>,
        #[arg(long)]
        sort: Option<SortMode>,
        #[arg(long)]
        open_now: Option<bool>,
        #[arg(long)]
        food_type: Option<String>,
        /// Plan a route to the result at this position
        #[arg(long)]
        navigate: Option<usize>,
        #[arg(long, default_value = "walking")]
        mode: TravelMode,
    },
    /// Save a place as favorite
    Favorite {
        place_id: String,
        name: String,
        #[arg(long)]
        station: Option<String>,
    },
    /// Remove a saved place
    Unfavorite { place_id: String },
    /// List saved places
    Favorites,
    /// List recently searched stations
    History,
    /// Show saved preferences
    Prefs,
}

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| format!("Configuration error: {}", e))?;

    init_logging(&settings.logging.level, &settings.logging.format);

    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&settings.storage.path)?);
    let mut session = SearchSession::from_settings(&settings, storage);

    if is_api_key_configured(&settings.provider.api_key) {
        let client = GooglePlacesClient::new(
            settings.provider.base_url.clone(),
            settings.provider.geolocation_url.clone(),
            settings.provider.api_key.clone(),
            settings.provider.language.clone(),
            Duration::from_secs(settings.provider.timeout_secs),
        )?;
        let provider = CachingProvider::new(
            client,
            settings.search.cache_capacity,
            settings.search.cache_ttl_secs,
        );
        info!("Using Google Maps provider");
        let result = run(cli.command, &mut session, &provider, &settings).await;
        tracing::debug!("Provider cache: {:?}", provider.stats());
        result
    } else {
        info!("Maps API key not configured, results will be synthetic");
        let provider = UnavailableProvider::new("API key not configured");
        run(cli.command, &mut session, &provider, &settings).await
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays machine readable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn run<P: PlacesProvider>(
    command: Commands,
    session: &mut SearchSession,
    provider: &P,
    settings: &Settings,
) -> Result<(), BoxError> {
    match command {
        Commands::Search {
            station,
            radius,
            price_level,
            sort,
            open_now,
            food_type,
            navigate,
            mode,
        } => {
            let mut preferences = session.preferences().clone();
            if let Some(radius) = radius {
                preferences.radius = radius;
            }
            if let Some(price_level) = price_level {
                preferences.price_level = price_level;
            }
            if let Some(sort) = sort {
                preferences.sort_mode = sort;
            }
            if let Some(open_now) = open_now {
                preferences.open_now_only = open_now;
            }
            if let Some(food_type) = food_type {
                if !food_type.is_empty() && !is_known_food_type(&food_type) {
                    return Err(format!("Unknown food type '{}'", food_type).into());
                }
                preferences.food_type = food_type;
            }
            session
                .update_preferences(preferences)
                .map_err(|e| format!("Invalid search settings: {}", e))?;

            let outcome = session.search(provider, &station).await.map_err(|e| {
                error!("Search failed: {}", e);
                e
            })?;

            let results: Vec<_> = outcome
                .results
                .iter()
                .map(|r| {
                    json!({
                        "placeId": r.id(),
                        "name": r.candidate.name,
                        "score": r.score,
                        "rating": r.candidate.rating,
                        "reviews": r.candidate.review_count,
                        "price": r.candidate.price_tier.map(price_tier_label),
                        "distanceM": r.distance_m.map(f64::round),
                        "walkMinutes": r.walking_minutes(settings.search.walking_speed_m_per_min),
                        "tags": card_tags(&r.candidate),
                        "status": r.candidate.business_status.map(|s| s.label()),
                        "address": r.candidate.address,
                        "photoUrl": r.candidate.photo_url.as_deref().map(|u| provider.photo_url(u)),
                    })
                })
                .collect();

            print_json(&json!({
                "station": outcome.station,
                "source": outcome.source,
                "notice": outcome.notice,
                "stats": search_stats(outcome.results.len(), outcome.total_candidates()),
                "results": results,
            }))?;

            if let Some(index) = navigate {
                let place_id = session
                    .result_at(index)
                    .map(|r| r.id().to_string())
                    .ok_or_else(|| format!("No result at position {}", index))?;
                let plan = session
                    .navigate(provider, &place_id, mode, &settings.geolocation.request())
                    .await?;

                print_json(&json!({
                    "placeId": plan.place_id,
                    "name": plan.name,
                    "distance": plan.route.as_ref().map(|r| r.distance_text.clone()),
                    "duration": plan.route.as_ref().map(|r| r.duration_text.clone()),
                    "mapsUrl": plan.maps_url,
                }))?;
            }
        }
        Commands::Favorite {
            place_id,
            name,
            station,
        } => {
            let mut entry = FavoriteEntry::new(place_id, name);
            entry.station_context = station;
            entry.saved_at = Some(chrono::Utc::now());
            let added = session.add_favorite(entry);
            print_json(&json!({ "added": added, "count": session.favorites().len() }))?;
        }
        Commands::Unfavorite { place_id } => {
            let removed = session.remove_favorite(&place_id);
            print_json(&json!({ "removed": removed, "count": session.favorites().len() }))?;
        }
        Commands::Favorites => print_json(&session.favorites().list())?,
        Commands::History => print_json(&session.history())?,
        Commands::Prefs => print_json(session.preferences())?,
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use anyhow::{Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube: YouTubeConfig,
    /// `None` disables cast lookups and actor enrichment.
    pub tmdb: Option<TmdbConfig>,
    pub host: String,
    pub port: u16,
    pub default_max_results: u32,
    pub enrich_actor_count: usize,
    pub cors_allowed_origins: Vec<String>,
    pub debug: bool,
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("YOUTUBE_API_KEY")
            .context("YOUTUBE_API_KEY environment variable must be set")?;
        let timeout_secs: f64 = parse_or(&lookup, "YOUTUBE_REQUEST_TIMEOUT", 15.0)?;
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            anyhow::bail!("YOUTUBE_REQUEST_TIMEOUT must be a positive number of seconds");
        }
        let request_timeout = Duration::from_secs_f64(timeout_secs);

        let youtube = YouTubeConfig {
            api_key,
            base_url: lookup("YOUTUBE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            request_timeout,
        };

        let tmdb = lookup("TMDB_API_KEY").map(|api_key| TmdbConfig {
            api_key,
            base_url: lookup("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string()),
            image_base_url: lookup("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_IMAGE_BASE_URL.to_string()),
            request_timeout,
        });

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(AppConfig {
            youtube,
            tmdb,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            default_max_results: parse_or(&lookup, "YOUTUBE_MAX_RESULTS", 15)?,
            enrich_actor_count: parse_or(&lookup, "ENRICH_ACTOR_COUNT", 3)?,
            cors_allowed_origins,
            debug: lookup("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }
}

pub fn init_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new().filter_level(level).init();
    info!("Starting movie aggregator backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_cors(allowed_origins: &[String]) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(allowed_origins))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}

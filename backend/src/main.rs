use backend::config::{create_cors, init_logger, load_environment, AppConfig};
use backend::services::tmdb_service::{MovieSource, TmdbClient};
use backend::services::youtube_service::YouTubeClient;
use backend::{mount_routes, AppState};
use log::{info, warn};
use rocket::figment::Figment;
use std::sync::Arc;

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let videos = Arc::new(YouTubeClient::new(config.youtube.clone())?);

    let movies: Option<Arc<dyn MovieSource>> = match &config.tmdb {
        Some(tmdb) => Some(Arc::new(TmdbClient::new(tmdb.clone())?)),
        None => {
            warn!("TMDB_API_KEY not set, actor enrichment and movie details are disabled");
            None
        }
    };

    Ok(AppState {
        videos,
        movies,
        default_max_results: config.default_max_results,
        enrich_actor_count: config.enrich_actor_count,
    })
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    let config = AppConfig::from_env()?;
    init_logger(config.debug);

    let state = build_state(&config)?;
    let cors = create_cors(&config.cors_allowed_origins)?;

    let figment: Figment = rocket::Config::figment()
        .merge(("address", config.host.clone()))
        .merge(("port", config.port));
    info!("Listening on {}:{}", config.host, config.port);

    let _rocket = mount_routes(rocket::custom(figment), state)
        .attach(cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;
    Ok(())
}

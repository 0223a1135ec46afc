#[macro_use]
extern crate rocket;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use rocket::{Build, Rocket};
use services::tmdb_service::MovieSource;
use services::youtube_service::VideoSource;
use std::sync::Arc;

pub struct AppState {
    pub videos: Arc<dyn VideoSource>,
    pub movies: Option<Arc<dyn MovieSource>>,
    pub default_max_results: u32,
    pub enrich_actor_count: usize,
}

impl AppState {
    pub fn max_results(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_max_results)
    }
}

pub fn mount_routes(rocket: Rocket<Build>, state: AppState) -> Rocket<Build> {
    rocket
        .manage(state)
        .mount("/", routes![api::index, api::health_check])
        .mount(
            "/",
            routes![
                api::get_movie_info,
                api::get_movie_details,
                api::search_videos,
                api::get_actor_interviews,
            ],
        )
        .mount(
            "/",
            routes![
                api::get_actor_info,
                api::analyze_actor_interviews,
                api::get_actor_career,
                api::get_actor_collaborations,
                api::discover_actors_from_movie,
                api::search_actors,
                api::get_trending_actors,
                api::get_actors_by_genre,
            ],
        )
}

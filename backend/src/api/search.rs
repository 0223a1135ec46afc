use crate::models::{ApiError, VideoRecord};
use crate::services::content_service;
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/search/<query>?<max_results>")]
pub async fn search_videos(
    query: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<VideoRecord>>, ApiError> {
    let videos =
        content_service::search_videos(state, query, state.max_results(max_results)).await?;
    info!("Search '{query}' returned {} videos", videos.len());
    Ok(Json(videos))
}

#[get("/interviews/<actor_name>?<movie_title>&<max_results>")]
pub async fn get_actor_interviews(
    actor_name: &str,
    movie_title: Option<&str>,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<VideoRecord>>, ApiError> {
    content_service::actor_interviews(
        state,
        actor_name,
        movie_title,
        state.max_results(max_results),
    )
    .await
    .map(Json)
}

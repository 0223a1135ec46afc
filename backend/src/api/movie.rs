use crate::models::{AggregateResult, ApiError, MovieDetails};
use crate::services::content_service;
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/movie/<movie_title>?<max_results>&<enrich>")]
pub async fn get_movie_info(
    movie_title: &str,
    max_results: Option<u32>,
    enrich: Option<bool>,
    state: &State<AppState>,
) -> Result<Json<AggregateResult>, ApiError> {
    let result = content_service::movie_aggregate(
        state,
        movie_title,
        state.max_results(max_results),
        enrich.unwrap_or(true),
    )
    .await?;

    info!(
        "Movie '{movie_title}': {} videos, {} views",
        result.total_videos, result.total_views
    );
    Ok(Json(result))
}

#[get("/movie/<movie_title>/details")]
pub async fn get_movie_details(
    movie_title: &str,
    state: &State<AppState>,
) -> Result<Json<MovieDetails>, ApiError> {
    content_service::movie_details(state, movie_title)
        .await
        .map(Json)
}

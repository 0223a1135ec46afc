use crate::models::{
    ActorDiscoveryResult, ActorInfo, ApiError, CareerEntry, Collaboration, InterviewAnalysis,
};
use crate::services::{actor_service, content_service};
use crate::AppState;
use chrono::Utc;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/actor/<actor_name>?<max_results>")]
pub async fn get_actor_info(
    actor_name: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<ActorInfo>, ApiError> {
    let interviews =
        content_service::require_actor_interviews(state, actor_name, state.max_results(max_results))
            .await?;
    let info = actor_service::build_actor_info(actor_name, interviews, Utc::now());
    info!(
        "Actor '{actor_name}': {} interviews, {} movies",
        info.total_interviews, info.total_movies
    );
    Ok(Json(info))
}

#[get("/actor/<actor_name>/interviews/analysis?<max_results>")]
pub async fn analyze_actor_interviews(
    actor_name: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<InterviewAnalysis>, ApiError> {
    let interviews =
        content_service::require_actor_interviews(state, actor_name, state.max_results(max_results))
            .await?;
    Ok(Json(actor_service::analyze_interview_patterns(
        &interviews,
        actor_name,
    )))
}

#[get("/actor/<actor_name>/career?<max_results>")]
pub async fn get_actor_career(
    actor_name: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<CareerEntry>>, ApiError> {
    let interviews = content_service::actor_interviews(
        state,
        actor_name,
        None,
        state.max_results(max_results),
    )
    .await?;
    let movies = actor_service::extract_movies_from_content(&interviews);
    let career = actor_service::build_career_timeline(&movies, &interviews);
    if career.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No career information found for actor '{actor_name}'"
        )));
    }
    Ok(Json(career))
}

#[get("/actor/<actor_name>/collaborations?<max_results>")]
pub async fn get_actor_collaborations(
    actor_name: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<Collaboration>>, ApiError> {
    let interviews = content_service::actor_interviews(
        state,
        actor_name,
        None,
        state.max_results(max_results),
    )
    .await?;
    Ok(Json(actor_service::extract_collaborations(
        &interviews,
        actor_name,
    )))
}

#[get("/discover/actors?<movie_title>&<max_results>")]
pub async fn discover_actors_from_movie(
    movie_title: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<ActorDiscoveryResult>>, ApiError> {
    content_service::discover_from_movie(state, movie_title, state.max_results(max_results))
        .await
        .map(Json)
}

#[get("/actors/search?<query>&<max_results>")]
pub async fn search_actors(
    query: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<ActorDiscoveryResult>>, ApiError> {
    content_service::search_actors(state, query, state.max_results(max_results))
        .await
        .map(Json)
}

#[get("/actors/trending?<period>&<max_results>")]
pub async fn get_trending_actors(
    period: Option<&str>,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<ActorDiscoveryResult>>, ApiError> {
    content_service::trending_actors(
        state,
        period.unwrap_or("week"),
        state.max_results(max_results),
    )
    .await
    .map(Json)
}

#[get("/actors/genre/<genre>?<max_results>")]
pub async fn get_actors_by_genre(
    genre: &str,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<ActorDiscoveryResult>>, ApiError> {
    content_service::actors_by_genre(state, genre, state.max_results(max_results))
        .await
        .map(Json)
}

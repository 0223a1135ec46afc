use crate::models::{
    ActorDiscoveryResult, AggregateResult, ApiError, Category, InvalidRecord, MovieDetails,
    VideoMetadata, VideoRecord,
};
use crate::services::actor_service::discover_actors;
use crate::services::aggregator::{aggregate, enrich};
use crate::services::youtube_service::{VideoQuery, VideoSource};
use crate::AppState;
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::task::JoinSet;

const INTERVIEWS_PER_ACTOR: u32 = 5;

pub fn classify_all(videos: Vec<VideoMetadata>) -> Result<Vec<VideoRecord>, InvalidRecord> {
    videos.into_iter().map(VideoRecord::classified).collect()
}

fn label_all(videos: Vec<VideoMetadata>, label: Category) -> Vec<VideoRecord> {
    videos
        .into_iter()
        .filter_map(|v| match VideoRecord::labeled(v, label) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping enrichment video: {e}");
                None
            }
        })
        .collect()
}

async fn search(state: &AppState, query: &VideoQuery) -> Result<Vec<VideoMetadata>, ApiError> {
    state
        .videos
        .search(query)
        .await
        .map_err(|e| ApiError::Upstream(format!("Video search for '{}' failed: {e}", query.q)))
}

async fn lookup_cast(state: &AppState, movie_title: &str) -> anyhow::Result<Option<MovieDetails>> {
    match &state.movies {
        Some(movies) => movies.find_movie(movie_title).await,
        None => Ok(None),
    }
}

/// Runs one interview search per actor concurrently. Failed or empty searches
/// are skipped; batches come back in `actors` order whatever the arrival order.
async fn fetch_actor_interviews(
    videos: Arc<dyn VideoSource>,
    actors: &[String],
    movie_title: &str,
) -> Vec<(String, Vec<VideoMetadata>)> {
    let mut searches = JoinSet::new();
    for (index, actor) in actors.iter().enumerate() {
        let source = videos.clone();
        let query = VideoQuery::actor_interviews(actor, Some(movie_title), INTERVIEWS_PER_ACTOR);
        searches.spawn(async move { (index, source.search(&query).await) });
    }

    let mut batches = Vec::with_capacity(actors.len());
    while let Some(joined) = searches.join_next().await {
        match joined {
            Ok((index, Ok(found))) if found.is_empty() => {
                debug!("No interviews found for {}", actors[index])
            }
            Ok((index, Ok(found))) => batches.push((index, found)),
            Ok((index, Err(e))) => {
                warn!("Interview search for {} failed, skipping: {e}", actors[index])
            }
            Err(e) => warn!("Interview search task failed: {e:?}"),
        }
    }

    batches.sort_by_key(|(index, _)| *index);
    batches
        .into_iter()
        .map(|(index, found)| (actors[index].clone(), found))
        .collect()
}

/// Primary movie search plus optional cast-driven interview enrichment.
/// Only the primary search can fail the request.
pub async fn movie_aggregate(
    state: &AppState,
    movie_title: &str,
    max_results: u32,
    enrich_actors: bool,
) -> Result<AggregateResult, ApiError> {
    let query = VideoQuery::movie_content(movie_title, max_results);
    let cast = async {
        if enrich_actors {
            lookup_cast(state, movie_title).await
        } else {
            Ok(None)
        }
    };
    let (primary, movie) = tokio::join!(search(state, &query), cast);

    let videos = primary?;
    if videos.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No content found for movie '{movie_title}'"
        )));
    }
    let base = aggregate(movie_title, classify_all(videos)?);

    let cast: Vec<String> = match movie {
        Ok(Some(details)) => details
            .actors
            .into_iter()
            .take(state.enrich_actor_count)
            .map(|a| a.name)
            .collect(),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Cast lookup for '{movie_title}' failed, skipping enrichment: {e:?}");
            Vec::new()
        }
    };
    if cast.is_empty() {
        return Ok(base);
    }

    let batches = fetch_actor_interviews(state.videos.clone(), &cast, movie_title).await;
    let mut actors = Vec::with_capacity(batches.len());
    let mut extra = Vec::new();
    for (actor, found) in batches {
        actors.push(actor);
        extra.extend(found);
    }
    info!(
        "Enriching '{movie_title}' with {} interviews from {} of {} actors",
        extra.len(),
        actors.len(),
        cast.len()
    );
    let mut result = enrich(base, label_all(extra, Category::Interview), Category::Interview);
    result.actors = actors;
    Ok(result)
}

pub async fn movie_details(state: &AppState, movie_title: &str) -> Result<MovieDetails, ApiError> {
    let movies = state
        .movies
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Movie metadata lookups are not configured".into()))?;
    movies
        .find_movie(movie_title)
        .await
        .map_err(|e| ApiError::Upstream(format!("Movie lookup for '{movie_title}' failed: {e}")))?
        .ok_or_else(|| ApiError::NotFound(format!("No movie found for '{movie_title}'")))
}

pub async fn search_videos(
    state: &AppState,
    query: &str,
    max_results: u32,
) -> Result<Vec<VideoRecord>, ApiError> {
    let videos = search(state, &VideoQuery::movie_content(query, max_results)).await?;
    Ok(classify_all(videos)?)
}

pub async fn actor_interviews(
    state: &AppState,
    actor_name: &str,
    movie_title: Option<&str>,
    max_results: u32,
) -> Result<Vec<VideoRecord>, ApiError> {
    let query = VideoQuery::actor_interviews(actor_name, movie_title, max_results);
    let videos = search(state, &query).await?;
    Ok(videos
        .into_iter()
        .map(|v| VideoRecord::labeled(v, Category::Interview))
        .collect::<Result<_, _>>()?)
}

/// `actor_interviews`, but an empty result is a 404.
pub async fn require_actor_interviews(
    state: &AppState,
    actor_name: &str,
    max_results: u32,
) -> Result<Vec<VideoRecord>, ApiError> {
    let interviews = actor_interviews(state, actor_name, None, max_results).await?;
    if interviews.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No interviews found for actor '{actor_name}'"
        )));
    }
    Ok(interviews)
}

pub async fn discover_from_movie(
    state: &AppState,
    movie_title: &str,
    max_results: u32,
) -> Result<Vec<ActorDiscoveryResult>, ApiError> {
    let query = VideoQuery::movie_content(movie_title, max_results.saturating_mul(2));
    let videos = search(state, &query).await?;
    if videos.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No content found for movie '{movie_title}'"
        )));
    }
    let mut actors = discover_actors(&classify_all(videos)?, movie_title, Utc::now());
    actors.truncate(max_results as usize);
    Ok(actors)
}

pub async fn search_actors(
    state: &AppState,
    name_query: &str,
    max_results: u32,
) -> Result<Vec<ActorDiscoveryResult>, ApiError> {
    let query = VideoQuery::new(format!("{name_query} actor interview"), max_results.saturating_mul(2));
    let videos = classify_all(search(state, &query).await?)?;
    let needle = name_query.to_lowercase();
    let mut actors: Vec<ActorDiscoveryResult> = discover_actors(&videos, "", Utc::now())
        .into_iter()
        .filter(|a| a.actor_name.to_lowercase().contains(&needle))
        .collect();
    actors.truncate(max_results as usize);
    Ok(actors)
}

pub fn trending_window(period: &str) -> Option<Duration> {
    match period {
        "day" => Some(Duration::days(1)),
        "week" => Some(Duration::weeks(1)),
        "month" => Some(Duration::days(30)),
        _ => None,
    }
}

pub async fn trending_actors(
    state: &AppState,
    period: &str,
    max_results: u32,
) -> Result<Vec<ActorDiscoveryResult>, ApiError> {
    let window = trending_window(period).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown period '{period}', expected day, week or month"))
    })?;
    let now = Utc::now();
    let query = VideoQuery::new("actor interview", max_results.saturating_mul(2))
        .published_after(now - window);
    let videos = classify_all(search(state, &query).await?)?;
    let mut actors = discover_actors(&videos, "", now);
    actors.truncate(max_results as usize);
    Ok(actors)
}

pub async fn actors_by_genre(
    state: &AppState,
    genre: &str,
    max_results: u32,
) -> Result<Vec<ActorDiscoveryResult>, ApiError> {
    let query = VideoQuery::new(format!("{genre} movie actor interview"), max_results.saturating_mul(2));
    let videos = classify_all(search(state, &query).await?)?;
    let mut actors = discover_actors(&videos, "", Utc::now());
    actors.truncate(max_results as usize);
    Ok(actors)
}

use crate::config::TmdbConfig;
use crate::models::{CastMember, MovieDetails};
use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

const TOP_CAST: usize = 10;

/// Movie metadata lookup, used for cast-driven enrichment.
#[rocket::async_trait]
pub trait MovieSource: Send + Sync {
    async fn find_movie(&self, title: &str) -> Result<Option<MovieDetails>>;
}

pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}")).context("Invalid TMDB base URL")?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("language", "en-US");
        Ok(url)
    }

    /// `Ok(None)` on 404, an error on any other non-success status. The URL
    /// carries the api key, so it is stripped from reqwest errors.
    async fn get_json(&self, url: Url) -> Result<Option<Value>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(
                response
                    .json::<Value>()
                    .await
                    .map_err(reqwest::Error::without_url)?,
            )),
            status => Err(anyhow::anyhow!("TMDB request failed with status {status}")),
        }
    }

    pub async fn search_movie(&self, query: &str) -> Result<Option<Value>> {
        let mut url = self.endpoint("search/movie")?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", "1")
            .append_pair("include_adult", "false");

        let response = self.get_json(url).await?;
        Ok(response.and_then(|body| body["results"].as_array()?.first().cloned()))
    }

    pub async fn get_movie_details(&self, movie_id: u64) -> Result<Option<Value>> {
        let mut url = self.endpoint(&format!("movie/{movie_id}"))?;
        url.query_pairs_mut()
            .append_pair("append_to_response", "credits");
        self.get_json(url).await
    }
}

#[rocket::async_trait]
impl MovieSource for TmdbClient {
    async fn find_movie(&self, title: &str) -> Result<Option<MovieDetails>> {
        let hit = match self.search_movie(title).await {
            Ok(Some(hit)) => hit,
            Ok(None) => {
                debug!("TMDB has no match for '{title}'");
                return Ok(None);
            }
            Err(e) => {
                error!("TMDB search for '{title}' failed: {e:?}");
                return Err(e);
            }
        };

        let Some(movie_id) = hit["id"].as_u64() else {
            return Ok(None);
        };

        let details = self.get_movie_details(movie_id).await?.unwrap_or(hit);
        Ok(Some(format_movie_data(
            &details,
            &details["credits"],
            &self.config.image_base_url,
        )))
    }
}

fn image_url(image_base_url: &str, path: &Value) -> Option<String> {
    path.as_str()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{image_base_url}{p}"))
}

fn opt_string(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(String::from)
}

/// Flattens a TMDB movie payload; `credits` may be `Null`.
pub fn format_movie_data(movie: &Value, credits: &Value, image_base_url: &str) -> MovieDetails {
    let release_date = opt_string(&movie["release_date"]);
    let year = release_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok());

    let genres = movie["genres"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|g| g["name"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let mut actors: Vec<CastMember> = credits["cast"]
        .as_array()
        .map(|cast| {
            cast.iter()
                .filter_map(|member| {
                    Some(CastMember {
                        id: member["id"].as_u64()?,
                        name: member["name"].as_str()?.to_string(),
                        character: opt_string(&member["character"]),
                        profile_path: image_url(image_base_url, &member["profile_path"]),
                        order: member["order"].as_u64().unwrap_or(999) as u32,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    actors.sort_by_key(|a| a.order);
    actors.truncate(TOP_CAST);

    MovieDetails {
        id: movie["id"].as_u64().unwrap_or(0),
        title: movie["title"].as_str().unwrap_or("").to_string(),
        original_title: opt_string(&movie["original_title"]),
        overview: opt_string(&movie["overview"]),
        release_date,
        year,
        runtime: movie["runtime"].as_u64().map(|r| r as u32),
        genres,
        poster_path: image_url(image_base_url, &movie["poster_path"]),
        backdrop_path: image_url(image_base_url, &movie["backdrop_path"]),
        vote_average: movie["vote_average"].as_f64(),
        vote_count: movie["vote_count"].as_u64(),
        actors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMAGES: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn formats_movie_with_cast() {
        let movie = json!({
            "id": 27205,
            "title": "Inception",
            "original_title": "Inception",
            "overview": "A thief who steals corporate secrets...",
            "release_date": "2010-07-15",
            "runtime": 148,
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "vote_average": 8.4,
            "vote_count": 35000
        });
        let cast: Vec<Value> = (0..12)
            .rev()
            .map(|i| json!({ "id": i, "name": format!("Actor {i}"), "character": "", "order": i }))
            .collect();
        let credits = json!({ "cast": cast });

        let details = format_movie_data(&movie, &credits, IMAGES);
        assert_eq!(details.id, 27205);
        assert_eq!(details.year, Some(2010));
        assert_eq!(details.runtime, Some(148));
        assert_eq!(details.genres, ["Action", "Science Fiction"]);
        assert_eq!(
            details.poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(details.backdrop_path, None);
        assert_eq!(details.actors.len(), 10);
        assert_eq!(details.actors[0].name, "Actor 0");
        assert_eq!(details.actors[9].order, 9);
        assert_eq!(details.actors[0].character, None);
    }

    #[test]
    fn tolerates_missing_credits() {
        let details = format_movie_data(&json!({ "id": 1, "title": "X" }), &Value::Null, IMAGES);
        assert!(details.actors.is_empty());
        assert_eq!(details.year, None);
    }

    mod client {
        use super::super::*;
        use super::IMAGES;
        use serde_json::json;
        use std::time::Duration;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const KEY: &str = "tmdb-test-key";

        fn client_for(base_url: String) -> TmdbClient {
            TmdbClient::new(TmdbConfig {
                api_key: KEY.to_string(),
                base_url,
                image_base_url: IMAGES.to_string(),
                request_timeout: Duration::from_secs(5),
            })
            .unwrap()
        }

        #[tokio::test]
        async fn finds_movie_with_credits() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search/movie"))
                .and(query_param("query", "Inception"))
                .and(query_param("api_key", KEY))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "results": [{ "id": 27205, "title": "Inception" }]
                })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/movie/27205"))
                .and(query_param("append_to_response", "credits"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "id": 27205,
                    "title": "Inception",
                    "release_date": "2010-07-15",
                    "credits": { "cast": [
                        { "id": 2, "name": "Joseph Gordon-Levitt", "order": 1 },
                        { "id": 1, "name": "Leonardo DiCaprio", "order": 0 }
                    ] }
                })))
                .mount(&server)
                .await;

            let movie = client_for(server.uri())
                .find_movie("Inception")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(movie.year, Some(2010));
            let names: Vec<&str> = movie.actors.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(names, ["Leonardo DiCaprio", "Joseph Gordon-Levitt"]);
        }

        #[tokio::test]
        async fn no_results_is_none() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search/movie"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
                .mount(&server)
                .await;

            assert!(client_for(server.uri())
                .find_movie("Nope")
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test]
        async fn unreachable_host_error_hides_key() {
            let err = client_for("http://127.0.0.1:1/3".to_string())
                .find_movie("Inception")
                .await
                .unwrap_err();
            assert!(!format!("{err:?}").contains(KEY));
        }
    }
}

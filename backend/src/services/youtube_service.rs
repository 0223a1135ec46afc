use crate::config::YouTubeConfig;
use crate::models::VideoMetadata;
use crate::utils::{parse_iso8601_to_datetime, youtube_watch_url};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, warn};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Upper bound the Data API accepts for `maxResults`.
pub const MAX_RESULTS_LIMIT: u32 = 50;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

#[derive(Debug, Clone, PartialEq)]
pub struct VideoQuery {
    pub q: String,
    pub max_results: u32,
    pub published_after: Option<DateTime<Utc>>,
}

impl VideoQuery {
    pub fn new(q: impl Into<String>, max_results: u32) -> Self {
        Self {
            q: q.into(),
            max_results: max_results.clamp(1, MAX_RESULTS_LIMIT),
            published_after: None,
        }
    }

    pub fn movie_content(movie_title: &str, max_results: u32) -> Self {
        Self::new(format!("{movie_title} movie"), max_results)
    }

    pub fn actor_interviews(actor_name: &str, movie_title: Option<&str>, max_results: u32) -> Self {
        let q = match movie_title {
            Some(movie) => format!("{actor_name} interview {movie}"),
            None => format!("{actor_name} interview"),
        };
        Self::new(q, max_results)
    }

    pub fn published_after(mut self, since: DateTime<Utc>) -> Self {
        self.published_after = Some(since);
        self
    }
}

/// Free-text video search. Implementations return unclassified metadata;
/// an error means "no data from this pass".
#[rocket::async_trait]
pub trait VideoSource: Send + Sync {
    async fn search(&self, query: &VideoQuery) -> Result<Vec<VideoMetadata>>;
}

pub struct YouTubeClient {
    client: Client,
    config: YouTubeConfig,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build YouTube HTTP client")?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).context("Invalid YouTube base URL")
    }

    /// The key travels in a header and reqwest errors are stripped of their
    /// URL, so neither ends up in logs or error responses.
    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "YouTube API request failed with status {status}: {body}"
            ));
        }
        Ok(response
            .json::<Value>()
            .await
            .map_err(reqwest::Error::without_url)?)
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    async fn search_snippets(&self, query: &VideoQuery) -> Result<Vec<VideoMetadata>> {
        let mut url = self.endpoint("search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("part", "snippet")
                .append_pair("type", "video")
                .append_pair("order", "relevance")
                .append_pair("videoDuration", "medium")
                .append_pair("q", &query.q)
                .append_pair("maxResults", &query.max_results.to_string());
            if let Some(since) = query.published_after {
                pairs.append_pair(
                    "publishedAfter",
                    &since.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
            }
        }

        let response = self.get_json(url).await?;
        Ok(parse_search_response(&response))
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/videos/list
    async fn fetch_details(&self, ids: &[&str]) -> Result<HashMap<String, VideoMetadata>> {
        let mut url = self.endpoint("videos")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,statistics,contentDetails")
            .append_pair("id", &ids.join(","));

        let response = self.get_json(url).await?;
        Ok(parse_videos_response(&response)
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect())
    }
}

#[rocket::async_trait]
impl VideoSource for YouTubeClient {
    async fn search(&self, query: &VideoQuery) -> Result<Vec<VideoMetadata>> {
        let snippets = self.search_snippets(query).await.map_err(|e| {
            error!("YouTube search for '{}' failed: {e:?}", query.q);
            e
        })?;
        debug!("YouTube search '{}' returned {} items", query.q, snippets.len());

        if snippets.is_empty() {
            return Ok(snippets);
        }

        // One batched details call instead of one per video.
        let ids: Vec<&str> = snippets.iter().map(|v| v.id.as_str()).collect();
        match self.fetch_details(&ids).await {
            Ok(mut details) => Ok(snippets
                .into_iter()
                .map(|snippet| details.remove(&snippet.id).unwrap_or(snippet))
                .collect()),
            Err(e) => {
                warn!("Fetching video details failed, returning snippets only: {e:?}");
                Ok(snippets)
            }
        }
    }
}

fn str_field(value: &Value) -> String {
    value.as_str().unwrap_or("").to_string()
}

fn count_field(value: &Value) -> Option<u64> {
    // The API encodes counts as strings.
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_u64())
}

fn metadata_from_snippet(video_id: &str, snippet: &Value) -> Option<VideoMetadata> {
    let title = str_field(&snippet["title"]);
    if video_id.is_empty() || title.trim().is_empty() {
        warn!("Skipping YouTube item without id or title: {video_id:?}");
        return None;
    }

    let thumbnails = &snippet["thumbnails"];
    let thumbnail = ["high", "medium", "default"]
        .iter()
        .find_map(|size| thumbnails[*size]["url"].as_str())
        .map(String::from);

    Some(VideoMetadata {
        id: video_id.to_string(),
        title,
        description: str_field(&snippet["description"]),
        channel_title: str_field(&snippet["channelTitle"]),
        published_at: snippet["publishedAt"]
            .as_str()
            .and_then(parse_iso8601_to_datetime),
        thumbnail,
        url: youtube_watch_url(video_id),
        ..Default::default()
    })
}

pub fn parse_search_response(response: &Value) -> Vec<VideoMetadata> {
    response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let video_id = item["id"]["videoId"].as_str().unwrap_or("");
                    metadata_from_snippet(video_id, &item["snippet"])
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_videos_response(response: &Value) -> Vec<VideoMetadata> {
    response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let video_id = item["id"].as_str().unwrap_or("");
                    let mut metadata = metadata_from_snippet(video_id, &item["snippet"])?;
                    let statistics = &item["statistics"];
                    metadata.view_count = count_field(&statistics["viewCount"]);
                    metadata.like_count = count_field(&statistics["likeCount"]);
                    metadata.comment_count = count_field(&statistics["commentCount"]);
                    metadata.duration = item["contentDetails"]["duration"]
                        .as_str()
                        .map(String::from);
                    Some(metadata)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_builders() {
        assert_eq!(VideoQuery::movie_content("Inception", 10).q, "Inception movie");
        assert_eq!(
            VideoQuery::actor_interviews("Tom Hardy", Some("Inception"), 5).q,
            "Tom Hardy interview Inception"
        );
        assert_eq!(
            VideoQuery::actor_interviews("Tom Hardy", None, 5).q,
            "Tom Hardy interview"
        );
        assert_eq!(VideoQuery::new("x", 500).max_results, MAX_RESULTS_LIMIT);
        assert_eq!(VideoQuery::new("x", 0).max_results, 1);
    }

    #[test]
    fn parses_search_items() {
        let response = json!({
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "YoHD9XEInc0" },
                    "snippet": {
                        "title": "Inception - Official Trailer",
                        "description": "Out now",
                        "channelTitle": "Warner Bros.",
                        "publishedAt": "2010-05-10T18:00:00Z",
                        "thumbnails": { "high": { "url": "https://i.ytimg.com/hq.jpg" } }
                    }
                },
                { "id": { "videoId": "" }, "snippet": { "title": "no id" } },
                { "id": { "videoId": "abc" }, "snippet": { "title": "" } }
            ]
        });

        let videos = parse_search_response(&response);
        assert_eq!(videos.len(), 1);
        let video = &videos[0];
        assert_eq!(video.id, "YoHD9XEInc0");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=YoHD9XEInc0");
        assert_eq!(video.channel_title, "Warner Bros.");
        assert_eq!(video.thumbnail.as_deref(), Some("https://i.ytimg.com/hq.jpg"));
        assert!(video.published_at.is_some());
        assert_eq!(video.view_count, None);
    }

    #[test]
    fn parses_video_statistics() {
        let response = json!({
            "items": [{
                "id": "YoHD9XEInc0",
                "snippet": { "title": "Inception - Official Trailer", "description": "" },
                "statistics": { "viewCount": "1000", "likeCount": "20" },
                "contentDetails": { "duration": "PT2M28S" }
            }]
        });

        let videos = parse_videos_response(&response);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].view_count, Some(1000));
        assert_eq!(videos[0].like_count, Some(20));
        assert_eq!(videos[0].comment_count, None);
        assert_eq!(videos[0].duration.as_deref(), Some("PT2M28S"));
    }

    #[test]
    fn missing_items_yield_nothing() {
        assert!(parse_search_response(&json!({})).is_empty());
        assert!(parse_videos_response(&json!({ "items": null })).is_empty());
    }

    mod client {
        use super::super::*;
        use serde_json::json;
        use std::time::Duration;
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const KEY: &str = "yt-test-key";

        fn client_for(base_url: String) -> YouTubeClient {
            YouTubeClient::new(YouTubeConfig {
                api_key: KEY.to_string(),
                base_url,
                request_timeout: Duration::from_secs(5),
            })
            .unwrap()
        }

        fn search_item(id: &str, title: &str) -> Value {
            json!({ "id": { "videoId": id }, "snippet": { "title": title, "description": "" } })
        }

        #[tokio::test]
        async fn merges_details_in_search_order() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .and(query_param("q", "Inception movie"))
                .and(header("x-goog-api-key", KEY))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [
                        search_item("a1", "Inception Official Trailer"),
                        search_item("b2", "Inception Review"),
                    ]
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/videos"))
                .and(query_param("id", "a1,b2"))
                .and(header("x-goog-api-key", KEY))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [{
                        "id": "b2",
                        "snippet": { "title": "Inception Review", "description": "" },
                        "statistics": { "viewCount": "42" },
                        "contentDetails": { "duration": "PT10M" }
                    }]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let videos = client_for(server.uri())
                .search(&VideoQuery::movie_content("Inception", 10))
                .await
                .unwrap();

            let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(ids, ["a1", "b2"]);
            assert_eq!(videos[0].view_count, None);
            assert_eq!(videos[1].view_count, Some(42));
            assert_eq!(videos[1].duration.as_deref(), Some("PT10M"));
        }

        #[tokio::test]
        async fn failed_details_fall_back_to_snippets() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": [search_item("a1", "Inception Official Trailer")]
                })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/videos"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let videos = client_for(server.uri())
                .search(&VideoQuery::movie_content("Inception", 10))
                .await
                .unwrap();

            assert_eq!(videos.len(), 1);
            assert_eq!(videos[0].id, "a1");
            assert_eq!(videos[0].view_count, None);
        }

        #[tokio::test]
        async fn empty_search_skips_details() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/videos"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
                .expect(0)
                .mount(&server)
                .await;

            let videos = client_for(server.uri())
                .search(&VideoQuery::movie_content("Nothing", 10))
                .await
                .unwrap();
            assert!(videos.is_empty());
        }

        #[tokio::test]
        async fn failed_search_is_an_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
                .mount(&server)
                .await;

            let err = client_for(server.uri())
                .search(&VideoQuery::movie_content("Inception", 10))
                .await
                .unwrap_err();
            let message = err.to_string();
            assert!(message.contains("403"));
            assert!(!message.contains(KEY));
        }

        #[tokio::test]
        async fn unreachable_host_error_hides_key() {
            let err = client_for("http://127.0.0.1:1/youtube/v3".to_string())
                .search(&VideoQuery::movie_content("Inception", 10))
                .await
                .unwrap_err();
            assert!(!format!("{err:?}").contains(KEY));
            assert!(!err.to_string().contains("127.0.0.1"));
        }
    }
}

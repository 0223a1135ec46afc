use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

/// Display category of a video. Declaration order is rule priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trailer,
    Interview,
    BehindTheScenes,
    Review,
    Clip,
    Music,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Trailer,
        Category::Interview,
        Category::BehindTheScenes,
        Category::Review,
        Category::Clip,
        Category::Music,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trailer => "trailer",
            Category::Interview => "interview",
            Category::BehindTheScenes => "behind_the_scenes",
            Category::Review => "review",
            Category::Clip => "clip",
            Category::Music => "music",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record {id:?}: {reason}")]
pub struct InvalidRecord {
    pub id: String,
    pub reason: &'static str,
}

/// Raw video data as returned by the video-search collaborator.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail: Option<String>,
    pub url: String,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub duration: Option<String>, // ISO8601, e.g. PT4M13S
}

impl VideoMetadata {
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.title.trim().is_empty() {
            return Err(InvalidRecord {
                id: self.id.clone(),
                reason: "missing title",
            });
        }
        if self.url.trim().is_empty() {
            return Err(InvalidRecord {
                id: self.id.clone(),
                reason: "missing url",
            });
        }
        Ok(())
    }

    /// Lowercased title and description, the text every keyword rule runs against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    pub fn views(&self) -> u64 {
        self.view_count.unwrap_or(0)
    }
}

/// A video with its category assigned. The category is fixed at construction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoRecord {
    #[serde(flatten)]
    pub metadata: VideoMetadata,
    pub category: Category,
}

impl VideoRecord {
    pub fn classified(metadata: VideoMetadata) -> Result<Self, InvalidRecord> {
        metadata.validate()?;
        let category = crate::services::classifier::classify(&metadata);
        Ok(VideoRecord { metadata, category })
    }

    pub fn labeled(metadata: VideoMetadata, category: Category) -> Result<Self, InvalidRecord> {
        metadata.validate()?;
        Ok(VideoRecord { metadata, category })
    }
}

/// Categorized videos for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub title: String,
    pub total_videos: usize,
    pub total_views: u64,
    pub videos_by_category: BTreeMap<Category, Vec<VideoRecord>>,
    pub actors: Vec<String>,
}

impl AggregateResult {
    pub fn bucket(&self, category: Category) -> &[VideoRecord] {
        self.videos_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Serialize)]
struct AggregateResultBody<'a> {
    title: &'a str,
    total_videos: usize,
    total_views: u64,
    videos_by_category: &'a BTreeMap<Category, Vec<VideoRecord>>,
    trailers: &'a [VideoRecord],
    interviews: &'a [VideoRecord],
    behind_the_scenes: &'a [VideoRecord],
    reviews: &'a [VideoRecord],
    clips: &'a [VideoRecord],
    music: &'a [VideoRecord],
    other: &'a [VideoRecord],
    actors: &'a [String],
}

impl Serialize for AggregateResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        AggregateResultBody {
            title: &self.title,
            total_videos: self.total_videos,
            total_views: self.total_views,
            videos_by_category: &self.videos_by_category,
            trailers: self.bucket(Category::Trailer),
            interviews: self.bucket(Category::Interview),
            behind_the_scenes: self.bucket(Category::BehindTheScenes),
            reviews: self.bucket(Category::Review),
            clips: self.bucket(Category::Clip),
            music: self.bucket(Category::Music),
            other: self.bucket(Category::Other),
            actors: &self.actors,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub actors: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerEntry {
    pub year: i32,
    pub movie_title: String,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String, // movie, tv_show, documentary, voice_role
    pub rating: Option<f64>,
    pub box_office: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collaboration {
    pub collaborator_name: String,
    pub collaboration_type: String, // co-star, director, producer
    pub movies: Vec<String>,
    pub interview_count: usize,
    pub total_views: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewCategory {
    pub category: String,
    pub count: usize,
    pub total_views: u64,
    pub average_duration: Option<String>,
    pub examples: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SocialMediaPresence {
    pub platform_mentions: BTreeMap<String, usize>,
    pub official_channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorDiscoveryResult {
    pub actor_name: String,
    pub confidence_score: f64,
    pub interview_count: usize,
    pub total_views: u64,
    pub recent_activity: String, // high, medium, low
    pub primary_genres: Vec<String>,
    pub sample_interviews: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorInfo {
    pub name: String,
    pub movies: Vec<String>,
    pub total_interviews: usize,
    pub total_views: u64,
    pub interviews: Vec<VideoRecord>,
    pub recent_content: Vec<VideoRecord>,
    pub top_interviews: Vec<VideoRecord>,
    pub career_timeline: Vec<CareerEntry>,
    pub interview_categories: BTreeMap<String, usize>,
    pub collaboration_network: Vec<Collaboration>,
    pub social_media_presence: SocialMediaPresence,
    pub total_movies: usize,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewAnalysis {
    pub actor_name: String,
    pub total_interviews: usize,
    pub total_views: u64,
    pub average_views: u64,
    pub engagement_rate: Option<f64>,
    pub categories: Vec<InterviewCategory>,
    pub top_channels: Vec<ChannelCount>,
    pub common_topics: Vec<TopicCount>,
    pub views_by_year: BTreeMap<i32, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelCount {
    pub channel_title: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Route-level failures, rendered as an `ErrorResponse` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Upstream(_) => Status::BadGateway,
            ApiError::Unavailable(_) => Status::ServiceUnavailable,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Unavailable(_) => "unavailable",
        }
    }
}

// A malformed record can only come from the video source.
impl From<InvalidRecord> for ApiError {
    fn from(e: InvalidRecord) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
        };
        let json = serde_json::to_string(&body).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

//! Heuristic analysis passes over interview videos.
//!
//! Everything here is a pure function of the video list (plus `now` where
//! recency matters), in the same shape as the classifier and aggregator.

use crate::models::{
    ActorDiscoveryResult, ActorInfo, CareerEntry, Category, ChannelCount, Collaboration,
    InterviewAnalysis, InterviewCategory, SocialMediaPresence, TopicCount, VideoRecord,
};
use crate::utils::{contains_any, format_duration, parse_iso8601_duration_to_seconds};
use chrono::{DateTime, Datelike, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

const RECENT_DAYS: i64 = 180;
const HIGH_ACTIVITY_DAYS: i64 = 30;
const DEFAULT_TOP_INTERVIEWS: usize = 5;
const MAX_EXAMPLES: usize = 3;
const MAX_TOPICS: usize = 10;
const MAX_CHANNELS: usize = 5;

lazy_static! {
    static ref QUOTED_TITLE: Regex =
        Regex::new(r#""([^"]{2,80})"|“([^”]{2,80})”|‘([^’]{2,80})’|(?:^|\s)'([^']{2,80})'"#)
            .expect("quoted title regex");
    static ref YEAR: Regex = Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("year regex");
    static ref PERSON_NAME: Regex = {
        let word = r"[A-Z][a-z]+(?:[A-Z][a-z]+|-[A-Z][a-z]+)?";
        Regex::new(&format!(r"\b({word}) ({word})(?: ({word}))?\b")).expect("person name regex")
    };
    static ref WORD: Regex = Regex::new(r"[a-z][a-z']{3,}").expect("word regex");
}

/// Interview-type labels, first match wins.
const INTERVIEW_TYPES: &[(&str, &[&str])] = &[
    ("press_junket", &["press junket", "junket", "press conference"]),
    (
        "talk_show",
        &[
            "talk show",
            "tonight show",
            "late show",
            "late night",
            "fallon",
            "kimmel",
            "colbert",
            "graham norton",
            "ellen show",
        ],
    ),
    ("podcast", &["podcast"]),
    ("red_carpet", &["red carpet", "premiere"]),
    (
        "behind_scenes",
        &["behind the scenes", "bts", "on set", "making of"],
    ),
];
const GENERAL_INTERVIEW: &str = "general";

const GENRES: &[(&str, &[&str])] = &[
    ("action", &["action", "fight", "stunt"]),
    ("animation", &["animated", "animation", "pixar"]),
    ("comedy", &["comedy", "funny", "hilarious"]),
    ("documentary", &["documentary"]),
    ("drama", &["drama", "emotional"]),
    ("fantasy", &["fantasy", "magic", "wizard"]),
    ("horror", &["horror", "scary", "terrifying"]),
    ("romance", &["romance", "romantic", "love story"]),
    ("sci-fi", &["sci-fi", "science fiction", "space", "alien"]),
    ("superhero", &["superhero", "marvel", "avengers", "batman"]),
    ("thriller", &["thriller", "suspense", "heist"]),
];

const SOCIAL_PLATFORMS: &[(&str, &[&str])] = &[
    ("facebook", &["facebook.com", "facebook"]),
    ("instagram", &["instagram.com", "instagram"]),
    ("tiktok", &["tiktok.com", "tiktok"]),
    ("twitter", &["twitter.com", "x.com/", "twitter"]),
    ("youtube", &["youtube.com/@", "youtube.com/c/", "subscribe"]),
];

/// Capitalized words that appear in title phrases without naming a person.
const NON_NAME_WORDS: &[&str] = &[
    "Academy", "Actor", "Actors", "Award", "Awards", "Behind", "Best", "Box", "Breaking",
    "Carpet", "Cast", "Clip", "Comic", "Director", "Episode", "Exclusive", "Explained", "Extended",
    "Featurette", "Film", "Full", "Interview", "Junket", "Late", "Live", "Making", "Movie",
    "Music", "New", "News", "Night", "Office", "Official", "Part", "Podcast", "Premiere", "Press",
    "Red", "Review", "Scene", "Scenes", "Season", "Show", "Song", "Starring", "Talk", "Talks",
    "Teaser", "The", "Theme", "Tonight", "Trailer", "Video", "With", "World",
];

const STOP_WORDS: &[&str] = &[
    "about", "after", "also", "been", "being", "from", "have", "interview", "into", "just",
    "like", "more", "movie", "official", "only", "over", "talks", "that", "their", "them",
    "then", "there", "they", "this", "video", "what", "when", "with", "would", "your",
];

fn interview_type(video: &VideoRecord) -> &'static str {
    let text = video.metadata.searchable_text();
    INTERVIEW_TYPES
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(label, _)| *label)
        .unwrap_or(GENERAL_INTERVIEW)
}

fn mentions(video: &VideoRecord, phrase: &str) -> bool {
    video
        .metadata
        .searchable_text()
        .contains(&phrase.to_lowercase())
}

/// Two- or three-word capitalized names. A rejected pair only consumes its
/// first word, so "Official Tom Hardy" still yields "Tom Hardy". A third word
/// followed by yet another capitalized word is left for the next name
/// ("Tom Hardy Charlize Theron") or treated as a title ("Tom Hardy Venom Interview").
fn person_names(title: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut start = 0;
    while let Some(caps) = PERSON_NAME.captures_at(title, start) {
        let (Some(first), Some(last)) = (caps.get(1), caps.get(2)) else {
            break;
        };
        if NON_NAME_WORDS.contains(&first.as_str()) || NON_NAME_WORDS.contains(&last.as_str()) {
            start = last.start();
            continue;
        }
        let third = caps.get(3).filter(|w| {
            !NON_NAME_WORDS.contains(&w.as_str()) && !capitalized_word_follows(&title[w.end()..])
        });
        match third {
            Some(third) => {
                names.push(format!("{} {} {}", first.as_str(), last.as_str(), third.as_str()));
                start = third.end();
            }
            None => {
                names.push(format!("{} {}", first.as_str(), last.as_str()));
                start = last.end();
            }
        }
    }
    names
}

fn capitalized_word_follows(rest: &str) -> bool {
    rest.strip_prefix(' ')
        .and_then(|r| r.chars().next())
        .is_some_and(char::is_uppercase)
}

/// Person names in a video title, minus quoted titles that merely look like
/// names ("Mad Max").
fn candidate_names(video: &VideoRecord) -> HashSet<String> {
    let quoted = extract_movies_from_content(std::slice::from_ref(video));
    person_names(&video.metadata.title)
        .into_iter()
        .filter(|name| !quoted.iter().any(|title| title.contains(name.as_str())))
        .collect()
}

fn sum_views<'a>(videos: impl IntoIterator<Item = &'a VideoRecord>) -> u64 {
    videos.into_iter().map(|v| v.metadata.views()).sum()
}

/// Distinct quoted titles ("Inception", “Dune”) from video titles, first seen first.
pub fn extract_movies_from_content(videos: &[VideoRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut movies = Vec::new();
    for video in videos {
        for caps in QUOTED_TITLE.captures_iter(&video.metadata.title) {
            let Some(m) = caps.iter().skip(1).flatten().next() else {
                continue;
            };
            let title = m.as_str().trim();
            if title.len() >= 2 && seen.insert(title.to_lowercase()) {
                movies.push(title.to_string());
            }
        }
    }
    movies
}

/// Videos published within the last 180 days, newest first.
pub fn get_recent_content(videos: &[VideoRecord], now: DateTime<Utc>) -> Vec<VideoRecord> {
    let cutoff = now - Duration::days(RECENT_DAYS);
    let mut recent: Vec<VideoRecord> = videos
        .iter()
        .filter(|v| v.metadata.published_at.is_some_and(|p| p >= cutoff))
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at));
    recent
}

pub fn get_top_interviews(videos: &[VideoRecord], limit: usize) -> Vec<VideoRecord> {
    let mut top = videos.to_vec();
    top.sort_by(|a, b| b.metadata.views().cmp(&a.metadata.views()));
    top.truncate(limit);
    top
}

pub fn categorize_interviews(videos: &[VideoRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for video in videos {
        *counts.entry(interview_type(video).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Per interview type: count, views, mean duration and a few examples.
/// Ordered by count, largest first.
pub fn interview_categories(videos: &[VideoRecord]) -> Vec<InterviewCategory> {
    let mut groups: BTreeMap<&'static str, Vec<&VideoRecord>> = BTreeMap::new();
    for video in videos {
        groups.entry(interview_type(video)).or_default().push(video);
    }

    let mut categories: Vec<InterviewCategory> = groups
        .into_iter()
        .map(|(label, members)| {
            let durations: Vec<i64> = members
                .iter()
                .filter_map(|v| v.metadata.duration.as_deref())
                .map(parse_iso8601_duration_to_seconds)
                .filter(|s| *s > 0)
                .collect();
            let average_duration = (!durations.is_empty()).then(|| {
                format_duration(durations.iter().sum::<i64>() / durations.len() as i64)
            });

            InterviewCategory {
                category: label.to_string(),
                count: members.len(),
                total_views: sum_views(members.iter().copied()),
                average_duration,
                examples: members.iter().take(MAX_EXAMPLES).map(|v| (*v).clone()).collect(),
            }
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories
}

fn entry_type(text: &str) -> &'static str {
    if contains_any(text, &["documentary"]) {
        "documentary"
    } else if contains_any(text, &["series", "season", "episode", "tv show"]) {
        "tv_show"
    } else if contains_any(text, &["voice", "voices", "animated"]) {
        "voice_role"
    } else {
        "movie"
    }
}

/// One entry per movie that can be dated from the first video mentioning it.
pub fn build_career_timeline(movies: &[String], videos: &[VideoRecord]) -> Vec<CareerEntry> {
    let mut timeline: Vec<CareerEntry> = movies
        .iter()
        .filter_map(|movie| {
            let video = videos.iter().find(|v| mentions(v, movie))?;
            let text = format!("{} {}", video.metadata.title, video.metadata.description);
            let year = YEAR
                .captures(&text)
                .and_then(|c| c[1].parse::<i32>().ok())
                .or_else(|| video.metadata.published_at.map(|p| p.year()))?;

            Some(CareerEntry {
                year,
                movie_title: movie.clone(),
                role: None,
                entry_type: entry_type(&text.to_lowercase()).to_string(),
                rating: None,
                box_office: None,
            })
        })
        .collect();
    timeline.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.movie_title.cmp(&b.movie_title)));
    timeline
}

fn collaboration_type(title: &str, name: &str) -> &'static str {
    let title = title.to_lowercase();
    let name = name.to_lowercase();
    if title.contains(&format!("director {name}")) || title.contains(&format!("{name}'s direction"))
    {
        "director"
    } else if title.contains(&format!("producer {name}")) {
        "producer"
    } else {
        "co-star"
    }
}

pub fn extract_collaborations(videos: &[VideoRecord], actor_name: &str) -> Vec<Collaboration> {
    let actor = actor_name.to_lowercase();
    let mut network: HashMap<String, Collaboration> = HashMap::new();

    for video in videos {
        let title = &video.metadata.title;
        let names: HashSet<String> = candidate_names(video)
            .into_iter()
            .filter(|n| n.to_lowercase() != actor)
            .collect();
        if names.is_empty() {
            continue;
        }
        let movies = extract_movies_from_content(std::slice::from_ref(video));

        for name in names {
            let kind = collaboration_type(title, &name);
            let entry = network.entry(name.clone()).or_insert_with(|| Collaboration {
                collaborator_name: name,
                collaboration_type: kind.to_string(),
                movies: Vec::new(),
                interview_count: 0,
                total_views: 0,
            });
            if entry.collaboration_type == "co-star" && kind != "co-star" {
                entry.collaboration_type = kind.to_string();
            }
            entry.interview_count += 1;
            entry.total_views += video.metadata.views();
            for movie in &movies {
                if !entry.movies.contains(movie) {
                    entry.movies.push(movie.clone());
                }
            }
        }
    }

    let mut collaborations: Vec<Collaboration> = network.into_values().collect();
    collaborations.sort_by(|a, b| {
        b.interview_count
            .cmp(&a.interview_count)
            .then_with(|| b.total_views.cmp(&a.total_views))
            .then_with(|| a.collaborator_name.cmp(&b.collaborator_name))
    });
    collaborations
}

pub fn extract_social_media_info(videos: &[VideoRecord], actor_name: &str) -> SocialMediaPresence {
    let actor = actor_name.to_lowercase();
    let mut presence = SocialMediaPresence::default();

    for video in videos {
        let description = video.metadata.description.to_lowercase();
        for (platform, markers) in SOCIAL_PLATFORMS {
            if contains_any(&description, markers) {
                *presence
                    .platform_mentions
                    .entry(platform.to_string())
                    .or_insert(0) += 1;
            }
        }
        if presence.official_channel.is_none()
            && !actor.is_empty()
            && video.metadata.channel_title.to_lowercase().contains(&actor)
        {
            presence.official_channel = Some(video.metadata.channel_title.clone());
        }
    }
    presence
}

/// Genre labels hit by keywords, most hits first.
pub fn extract_genres_from_content(videos: &[VideoRecord]) -> Vec<String> {
    let mut hits: BTreeMap<&str, usize> = BTreeMap::new();
    for video in videos {
        let text = video.metadata.searchable_text();
        for (genre, keywords) in GENRES {
            if contains_any(&text, keywords) {
                *hits.entry(*genre).or_insert(0) += 1;
            }
        }
    }
    let mut genres: Vec<(&str, usize)> = hits.into_iter().collect();
    genres.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    genres.into_iter().map(|(g, _)| g.to_string()).collect()
}

fn recent_activity(videos: &[&VideoRecord], now: DateTime<Utc>) -> &'static str {
    let newest = videos.iter().filter_map(|v| v.metadata.published_at).max();
    match newest {
        Some(p) if p >= now - Duration::days(HIGH_ACTIVITY_DAYS) => "high",
        Some(p) if p >= now - Duration::days(RECENT_DAYS) => "medium",
        _ => "low",
    }
}

/// Finds likely actor names in video titles. Words of `movie_title` are never
/// treated as part of a name.
pub fn discover_actors(
    videos: &[VideoRecord],
    movie_title: &str,
    now: DateTime<Utc>,
) -> Vec<ActorDiscoveryResult> {
    let movie_words: HashSet<String> = movie_title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();

    let mut candidates: BTreeMap<String, Vec<&VideoRecord>> = BTreeMap::new();
    for video in videos {
        let names: HashSet<String> = candidate_names(video)
            .into_iter()
            .filter(|n| {
                n.split(' ')
                    .all(|w| !movie_words.contains(&w.to_lowercase()))
            })
            .collect();
        for name in names {
            candidates.entry(name).or_default().push(video);
        }
    }

    let mut results: Vec<ActorDiscoveryResult> = candidates
        .into_iter()
        .map(|(name, found_in)| {
            let interviews: Vec<&VideoRecord> = found_in
                .iter()
                .copied()
                .filter(|v| v.category == Category::Interview)
                .collect();

            let mut confidence = 0.3 + 0.15 * found_in.len() as f64;
            if !interviews.is_empty() {
                confidence += 0.2;
            }

            let owned: Vec<VideoRecord> = found_in.iter().map(|v| (*v).clone()).collect();
            let mut primary_genres = extract_genres_from_content(&owned);
            primary_genres.truncate(3);

            ActorDiscoveryResult {
                actor_name: name,
                confidence_score: confidence.min(1.0),
                interview_count: found_in.len(),
                total_views: sum_views(found_in.iter().copied()),
                recent_activity: recent_activity(&found_in, now).to_string(),
                primary_genres,
                sample_interviews: interviews
                    .into_iter()
                    .take(MAX_EXAMPLES)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.confidence_score
            .total_cmp(&a.confidence_score)
            .then_with(|| b.interview_count.cmp(&a.interview_count))
            .then_with(|| a.actor_name.cmp(&b.actor_name))
    });
    results
}

pub fn analyze_interview_patterns(videos: &[VideoRecord], actor_name: &str) -> InterviewAnalysis {
    let total_views = sum_views(videos);
    let average_views = if videos.is_empty() {
        0
    } else {
        total_views / videos.len() as u64
    };

    let engagement: u64 = videos
        .iter()
        .map(|v| v.metadata.like_count.unwrap_or(0) + v.metadata.comment_count.unwrap_or(0))
        .sum();
    let engagement_rate = (total_views > 0).then(|| engagement as f64 / total_views as f64);

    let mut channels: HashMap<&str, usize> = HashMap::new();
    for video in videos.iter().filter(|v| !v.metadata.channel_title.is_empty()) {
        *channels.entry(video.metadata.channel_title.as_str()).or_insert(0) += 1;
    }
    let mut top_channels: Vec<ChannelCount> = channels
        .into_iter()
        .map(|(channel, count)| ChannelCount {
            channel_title: channel.to_string(),
            count,
        })
        .collect();
    top_channels.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.channel_title.cmp(&b.channel_title))
    });
    top_channels.truncate(MAX_CHANNELS);

    let name_words: HashSet<String> = actor_name
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    let mut words: HashMap<String, usize> = HashMap::new();
    for video in videos {
        let title = video.metadata.title.to_lowercase();
        let unique: HashSet<&str> = WORD.find_iter(&title).map(|m| m.as_str()).collect();
        for word in unique {
            if !STOP_WORDS.contains(&word) && !name_words.contains(word) {
                *words.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }
    let mut common_topics: Vec<TopicCount> = words
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(topic, count)| TopicCount { topic, count })
        .collect();
    common_topics.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    common_topics.truncate(MAX_TOPICS);

    let mut views_by_year = BTreeMap::new();
    for video in videos {
        if let Some(published) = video.metadata.published_at {
            *views_by_year.entry(published.year()).or_insert(0) += video.metadata.views();
        }
    }

    InterviewAnalysis {
        actor_name: actor_name.to_string(),
        total_interviews: videos.len(),
        total_views,
        average_views,
        engagement_rate,
        categories: interview_categories(videos),
        top_channels,
        common_topics,
        views_by_year,
    }
}

pub fn build_actor_info(actor_name: &str, interviews: Vec<VideoRecord>, now: DateTime<Utc>) -> ActorInfo {
    let movies = extract_movies_from_content(&interviews);

    ActorInfo {
        name: actor_name.to_string(),
        total_interviews: interviews.len(),
        total_views: sum_views(&interviews),
        recent_content: get_recent_content(&interviews, now),
        top_interviews: get_top_interviews(&interviews, DEFAULT_TOP_INTERVIEWS),
        career_timeline: build_career_timeline(&movies, &interviews),
        interview_categories: categorize_interviews(&interviews),
        collaboration_network: extract_collaborations(&interviews, actor_name),
        social_media_presence: extract_social_media_info(&interviews, actor_name),
        total_movies: movies.len(),
        genres: extract_genres_from_content(&interviews),
        movies,
        interviews,
    }
}

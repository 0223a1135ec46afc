use crate::models::{Category, VideoMetadata};

/// Keyword rules in evaluation order. The first rule with a hit decides the
/// category; anything unmatched falls through to `Category::Other`.
const RULES: &[(Category, &[&str])] = &[
    (Category::Trailer, &["trailer", "teaser"]),
    (
        Category::Interview,
        &[
            "interview",
            "talks about",
            "sits down",
            "press junket",
            "q&a",
        ],
    ),
    (
        Category::BehindTheScenes,
        &["behind the scenes", "bts", "making of"],
    ),
    (Category::Review, &["review", "reaction", "breakdown"]),
    (Category::Clip, &["clip", "scene"]),
    (
        Category::Music,
        &["soundtrack", "score", "music video", "theme song"],
    ),
];

/// Assigns exactly one category from title and description. Channel titles
/// are not matched: channel branding ("Movieclips Trailers") would swamp
/// the video's own text.
pub fn classify(video: &VideoMetadata) -> Category {
    classify_text(&video.searchable_text())
}

/// `text` must already be lowercased.
pub fn classify_text(text: &str) -> Category {
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> VideoMetadata {
        VideoMetadata {
            id: "id".to_string(),
            title: title.to_string(),
            url: "https://www.youtube.com/watch?v=id".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn classifies_known_titles() {
        let cases = [
            ("Inception - Official Trailer #1", Category::Trailer),
            (
                "Leonardo DiCaprio Talks About Inception (Interview)",
                Category::Interview,
            ),
            (
                "Making of Inception - Behind the Scenes",
                Category::BehindTheScenes,
            ),
            ("Inception Ending Explained - Movie Review", Category::Review),
            ("Inception Official Poster Reveal", Category::Other),
            ("Inception hallway fight clip", Category::Clip),
            ("Hans Zimmer - Time (Inception Soundtrack)", Category::Music),
        ];
        for (title, expected) in cases {
            assert_eq!(classify(&titled(title)), expected, "{title}");
        }
    }

    #[test]
    fn trailer_beats_review() {
        assert_eq!(
            classify(&titled("Inception Trailer Review")),
            Category::Trailer
        );
        let mut video = titled("Inception review");
        video.description = "We watch the new teaser".to_string();
        assert_eq!(classify(&video), Category::Trailer);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify(&titled("CAST Q&A PANEL")), Category::Interview);
        assert_eq!(classify(&titled("BtS footage")), Category::BehindTheScenes);
    }

    #[test]
    fn description_is_matched() {
        let mut video = titled("Inception");
        video.description = "Christopher Nolan sits down with us".to_string();
        assert_eq!(classify(&video), Category::Interview);
    }

    #[test]
    fn channel_title_is_ignored() {
        let mut video = titled("Inception Official Poster Reveal");
        video.channel_title = "Movieclips Trailers".to_string();
        assert_eq!(classify(&video), Category::Other);
    }

    #[test]
    fn classification_is_stable() {
        let video = titled("Inception reaction");
        assert_eq!(classify(&video), classify(&video));
    }

    #[test]
    fn rules_follow_category_order() {
        let order: Vec<Category> = RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::ALL[..6].to_vec());
    }
}

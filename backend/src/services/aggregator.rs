use crate::models::{AggregateResult, Category, VideoRecord};
use std::collections::BTreeMap;

fn empty_buckets() -> BTreeMap<Category, Vec<VideoRecord>> {
    Category::ALL.iter().map(|c| (*c, Vec::new())).collect()
}

fn totals(buckets: &BTreeMap<Category, Vec<VideoRecord>>) -> (usize, u64) {
    buckets
        .values()
        .flatten()
        .fold((0, 0), |(count, views), v| (count + 1, views + v.metadata.views()))
}

/// Groups classified videos by category. Every category gets a bucket, empty
/// or not, and each bucket keeps the input order.
pub fn aggregate(query: &str, videos: Vec<VideoRecord>) -> AggregateResult {
    let mut buckets = empty_buckets();
    for video in videos {
        buckets.entry(video.category).or_default().push(video);
    }

    let (total_videos, total_views) = totals(&buckets);

    AggregateResult {
        title: query.to_string(),
        total_videos,
        total_views,
        videos_by_category: buckets,
        actors: Vec::new(),
    }
}

/// Appends `extra` to the `label` bucket of `base` and recomputes the totals.
/// Ids are not deduplicated against `base`: the same video found by a second,
/// independent query shows up twice.
pub fn enrich(mut base: AggregateResult, extra: Vec<VideoRecord>, label: Category) -> AggregateResult {
    if extra.is_empty() {
        return base;
    }

    let bucket = base.videos_by_category.entry(label).or_default();
    bucket.extend(extra.into_iter().map(|mut v| {
        v.category = label;
        v
    }));

    let (total_videos, total_views) = totals(&base.videos_by_category);
    base.total_videos = total_videos;
    base.total_views = total_views;
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoMetadata;

    fn record(id: &str, title: &str, views: Option<u64>) -> VideoRecord {
        VideoRecord::classified(VideoMetadata {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={id}"),
            view_count: views,
            ..Default::default()
        })
        .unwrap()
    }

    fn bucket_sum(result: &AggregateResult) -> usize {
        result.videos_by_category.values().map(Vec::len).sum()
    }

    #[test]
    fn empty_input_has_all_buckets() {
        let result = aggregate("x", vec![]);
        assert_eq!(result.title, "x");
        assert_eq!(result.total_videos, 0);
        assert_eq!(result.total_views, 0);
        assert_eq!(result.videos_by_category.len(), Category::ALL.len());
        assert!(result.videos_by_category.values().all(Vec::is_empty));
    }

    #[test]
    fn three_video_scenario() {
        let result = aggregate(
            "Inception",
            vec![
                record("a", "Inception Official Trailer", Some(1000)),
                record("b", "Inception Cast Interview", Some(500)),
                record("c", "Inception Poster", None),
            ],
        );
        assert_eq!(result.total_videos, 3);
        assert_eq!(result.total_views, 1500);
        assert_eq!(result.bucket(Category::Trailer).len(), 1);
        assert_eq!(result.bucket(Category::Interview).len(), 1);
        assert_eq!(result.bucket(Category::Other).len(), 1);
        for category in [
            Category::BehindTheScenes,
            Category::Review,
            Category::Clip,
            Category::Music,
        ] {
            assert!(result.bucket(category).is_empty());
        }
        assert_eq!(bucket_sum(&result), result.total_videos);
    }

    #[test]
    fn buckets_keep_source_order() {
        let result = aggregate(
            "q",
            vec![
                record("1", "Trailer one", Some(1)),
                record("2", "Review", Some(2)),
                record("3", "Teaser two", Some(3)),
                record("4", "Trailer three", Some(4)),
            ],
        );
        let ids: Vec<&str> = result
            .bucket(Category::Trailer)
            .iter()
            .map(|v| v.metadata.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3", "4"]);
        assert_eq!(result.total_views, 10);
    }

    #[test]
    fn enrich_with_nothing_is_identity() {
        let base = aggregate("q", vec![record("1", "Trailer", Some(7))]);
        for label in Category::ALL {
            assert_eq!(enrich(base.clone(), vec![], label), base);
        }
    }

    #[test]
    fn enrich_appends_and_recounts() {
        let base = aggregate(
            "q",
            vec![
                record("1", "Trailer", Some(10)),
                record("2", "Press junket interview", Some(20)),
            ],
        );
        let extra = vec![
            record("2", "Press junket interview", Some(20)),
            record("3", "Poster reveal", None),
        ];
        let result = enrich(base, extra, Category::Interview);

        assert_eq!(result.total_videos, 4);
        assert_eq!(result.total_views, 50);
        assert_eq!(bucket_sum(&result), 4);
        let interviews = result.bucket(Category::Interview);
        assert_eq!(interviews.len(), 3);
        assert_eq!(interviews[1].metadata.id, "2");
        assert!(interviews.iter().all(|v| v.category == Category::Interview));
        assert!(result.bucket(Category::Other).is_empty());
    }
}

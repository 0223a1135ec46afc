use chrono::{DateTime, Utc};

/// Parse ISO8601 date string (as returned by the YouTube Data API)
pub fn parse_iso8601_to_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }
    date_str.parse::<DateTime<Utc>>().ok()
}

/// Parse ISO8601 duration string (PT1H2M3S) to total seconds
pub fn parse_iso8601_duration_to_seconds(duration_str: &str) -> i64 {
    if duration_str.is_empty() {
        return 0;
    }

    if !duration_str.starts_with("PT") {
        return 0;
    }

    let duration_part = &duration_str[2..]; // Remove "PT"
    let mut total_seconds = 0.0;
    let mut current_number = String::new();

    for ch in duration_part.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
        } else {
            if let Ok(num) = current_number.parse::<f64>() {
                match ch {
                    'H' => total_seconds += num * 3600.0,
                    'M' => total_seconds += num * 60.0,
                    'S' => total_seconds += num,
                    _ => {}
                }
            }
            current_number.clear();
        }
    }

    total_seconds as i64
}

/// Formats seconds as `M:SS`, or `H:MM:SS` past the hour
pub fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations() {
        assert_eq!(parse_iso8601_duration_to_seconds("PT4M13S"), 253);
        assert_eq!(parse_iso8601_duration_to_seconds("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration_to_seconds("PT45S"), 45);
        assert_eq!(parse_iso8601_duration_to_seconds("P1D"), 0);
        assert_eq!(parse_iso8601_duration_to_seconds(""), 0);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(253), "4:13");
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn parses_publish_dates() {
        let dt = parse_iso8601_to_datetime("2010-07-13T16:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1279036800);
        assert!(parse_iso8601_to_datetime("").is_none());
        assert!(parse_iso8601_to_datetime("yesterday").is_none());
    }
}

//! Detail → [`SearchRecord`] normalization.
//!
//! Pure and total: malformed numeric or date fields collapse to a zero value
//! instead of failing. Each parse helper returns a [`Parsed`] so callers can
//! see when that happened; [`normalize_with_defaults`] lists the fields that
//! were substituted so the caller can log and count them.

use chrono::{Local, NaiveDateTime, TimeZone};

use crate::detail::MovieDetail;
use crate::record::SearchRecord;

/// Fixed format of the upstream update time.
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A parsed value and whether it was substituted by the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self { value, defaulted: false }
    }

    fn default_to(value: T) -> Self {
        Self { value, defaulted: true }
    }
}

/// Parse a rating; `0.0` on failure.
///
/// `NaN` and the infinities count as failures: they have no JSON form and
/// no usable sorted-set score.
pub fn parse_score(raw: &str) -> Parsed<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::ok(v),
        _ => Parsed::default_to(0.0),
    }
}

/// Parse a base-10 year; `0` on failure.
pub fn parse_year(raw: &str) -> Parsed<i64> {
    match raw.parse::<i64>() {
        Ok(v) => Parsed::ok(v),
        Err(_) => Parsed::default_to(0),
    }
}

/// Parse `YYYY-MM-DD HH:MM:SS` in the local time zone to epoch seconds;
/// `0` on failure.
///
/// A wall-clock time that occurs twice (DST fall-back) resolves to the
/// earlier instant. One that never occurs counts as malformed.
pub fn parse_timestamp(raw: &str) -> Parsed<i64> {
    let Ok(naive) = NaiveDateTime::parse_from_str(raw, UPDATE_TIME_FORMAT) else {
        return Parsed::default_to(0);
    };
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => Parsed::ok(dt.timestamp()),
        None => Parsed::default_to(0),
    }
}

/// Build the canonical search record for a detail.
pub fn normalize(detail: &MovieDetail) -> SearchRecord {
    normalize_with_defaults(detail).0
}

/// Like [`normalize`], also naming the fields (`score`, `year`,
/// `timestamp`) that fell back to their default.
pub fn normalize_with_defaults(detail: &MovieDetail) -> (SearchRecord, Vec<&'static str>) {
    let d = &detail.descriptor;

    let score = parse_score(&d.db_score);
    let year = parse_year(&d.year);
    let timestamp = parse_timestamp(&d.update_time);

    let defaulted = [
        ("score", score.defaulted),
        ("year", year.defaulted),
        ("timestamp", timestamp.defaulted),
    ]
    .into_iter()
    .filter_map(|(field, defaulted)| defaulted.then_some(field))
    .collect();

    let record = SearchRecord {
        movie_id: detail.id,
        category_id: detail.cid,
        parent_category_id: detail.pid,
        name: detail.name.clone(),
        category_name: d.c_name.clone(),
        class_tag: d.class_tag.clone(),
        area: d.area.clone(),
        language: d.language.clone(),
        year: year.value,
        initial: d.initial.clone(),
        score: score.value,
        rank: d.db_id,
        timestamp: timestamp.value,
        state: d.state.clone(),
        remarks: d.remarks.clone(),
        release_rank: d.add_time,
    };
    (record, defaulted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> MovieDetail {
        let mut detail = MovieDetail {
            id: 42,
            cid: 6,
            pid: 1,
            name: "Night Train".to_string(),
            ..Default::default()
        };
        let d = &mut detail.descriptor;
        d.c_name = "Action".to_string();
        d.class_tag = "Action/Thriller".to_string();
        d.area = "USA/Canada".to_string();
        d.language = "English".to_string();
        d.year = "2021".to_string();
        d.initial = "N".to_string();
        d.db_score = "7.9".to_string();
        d.db_id = 998877;
        d.update_time = "2023-04-05 06:07:08".to_string();
        d.add_time = 1_680_000_000;
        d.state = "feature".to_string();
        d.remarks = "HD".to_string();
        detail
    }

    #[test]
    fn test_score_parse_and_default() {
        assert_eq!(parse_score("8.5"), Parsed { value: 8.5, defaulted: false });
        assert_eq!(parse_score("n/a"), Parsed { value: 0.0, defaulted: true });
        assert!(parse_score("").defaulted);
    }

    #[test]
    fn test_non_finite_score_defaults() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "-Infinity"] {
            assert_eq!(parse_score(raw), Parsed { value: 0.0, defaulted: true }, "{}", raw);
        }
        assert_eq!(parse_score("1e3"), Parsed { value: 1000.0, defaulted: false });
    }

    #[test]
    fn test_defaults_are_listed() {
        let (record, defaulted) = normalize_with_defaults(&detail());
        assert!(defaulted.is_empty());
        assert_eq!(record, normalize(&detail()));

        let mut broken = detail();
        broken.descriptor.db_score = "NaN".to_string();
        broken.descriptor.update_time = "yesterday".to_string();
        let (record, defaulted) = normalize_with_defaults(&broken);
        assert_eq!(defaulted, vec!["score", "timestamp"]);
        assert_eq!(record.score, 0.0);
        assert_eq!(record.timestamp, 0);
    }

    #[test]
    fn test_year_parse_and_default() {
        assert_eq!(parse_year("2019"), Parsed { value: 2019, defaulted: false });
        assert_eq!(parse_year("unknown"), Parsed { value: 0, defaulted: true });
        assert!(parse_year("2019 ").defaulted);
        assert!(parse_year("").defaulted);
    }

    #[test]
    fn test_timestamp_parse_local() {
        let parsed = parse_timestamp("2023-04-05 06:07:08");
        assert!(!parsed.defaulted);

        let naive = NaiveDateTime::parse_from_str("2023-04-05 06:07:08", UPDATE_TIME_FORMAT).unwrap();
        let expected = Local.from_local_datetime(&naive).earliest().unwrap().timestamp();
        assert_eq!(parsed.value, expected);
    }

    #[test]
    fn test_timestamp_malformed_is_epoch() {
        assert_eq!(parse_timestamp("not-a-date"), Parsed { value: 0, defaulted: true });
        assert_eq!(parse_timestamp("2023-04-05T06:07:08"), Parsed { value: 0, defaulted: true });
        assert_eq!(parse_timestamp(""), Parsed { value: 0, defaulted: true });
    }

    #[test]
    fn test_normalize_maps_fields() {
        let record = normalize(&detail());

        assert_eq!(record.movie_id, 42);
        assert_eq!(record.category_id, 6);
        assert_eq!(record.parent_category_id, 1);
        assert_eq!(record.category_name, "Action");
        assert_eq!(record.class_tag, "Action/Thriller");
        assert_eq!(record.area, "USA/Canada");
        assert_eq!(record.year, 2021);
        assert_eq!(record.score, 7.9);
        assert_eq!(record.rank, 998877);
        assert!(record.timestamp > 0);
        assert_eq!(record.release_rank, 1_680_000_000);
        assert_eq!(record.state, "feature");
        assert_eq!(record.remarks, "HD");
    }

    #[test]
    fn test_normalize_never_fails_on_garbage() {
        let mut detail = detail();
        detail.descriptor.year = "unknown".to_string();
        detail.descriptor.db_score = "n/a".to_string();
        detail.descriptor.update_time = "not-a-date".to_string();

        let record = normalize(&detail);
        assert_eq!(record.year, 0);
        assert_eq!(record.score, 0.0);
        assert_eq!(record.timestamp, 0);
    }

    #[test]
    fn test_release_rank_uses_add_time() {
        let mut detail = detail();
        detail.descriptor.release_date = "2001-01-01".to_string();
        let record = normalize(&detail);
        assert_eq!(record.release_rank, detail.descriptor.add_time);
    }
}

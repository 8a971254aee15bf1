//! Raw upstream records.
//!
//! These mirror the JSON the collector produces. Every field defaults when
//! missing so that a sparse upstream record still decodes; nothing here is
//! validated beyond that.

use serde::{Deserialize, Serialize};

/// One entry of a paged category listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieListing {
    pub id: i64,
    pub name: String,
    pub cid: i64,
    #[serde(rename = "CName")]
    pub c_name: String,
    #[serde(rename = "enName")]
    pub en_name: String,
    /// Update time as published by the source
    pub time: String,
    /// Remarks or resolution
    pub remarks: String,
    #[serde(rename = "playFrom")]
    pub play_from: String,
}

/// Descriptive part of a detail record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieDescriptor {
    pub sub_title: String,
    pub c_name: String,
    pub en_name: String,
    pub initial: String,
    /// Content tags, possibly `/`- or `,`-delimited
    pub class_tag: String,
    pub actor: String,
    pub director: String,
    pub writer: String,
    pub blurb: String,
    pub remarks: String,
    pub release_date: String,
    /// Regions, possibly `/`- or `,`-delimited
    pub area: String,
    /// Languages, possibly `/`- or `,`-delimited
    pub language: String,
    pub year: String,
    /// Release state (feature, trailer, ...)
    pub state: String,
    /// `YYYY-MM-DD HH:MM:SS` in the collector's local time zone
    pub update_time: String,
    /// Epoch seconds the resource was first added
    pub add_time: i64,
    /// External popularity identifier
    pub db_id: i64,
    /// External rating, as text
    pub db_score: String,
    pub content: String,
}

/// A single playable or downloadable episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeLink {
    pub episode: String,
    pub link: String,
}

/// Full detail record as delivered by the collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    pub id: i64,
    pub cid: i64,
    /// Parent category id: the facet and search-index partition
    pub pid: i64,
    pub name: String,
    pub picture: String,
    #[serde(rename = "playFrom")]
    pub play_from: Vec<String>,
    #[serde(rename = "DownFrom")]
    pub down_from: String,
    #[serde(rename = "playList")]
    pub play_list: Vec<Vec<EpisodeLink>>,
    #[serde(rename = "downloadList")]
    pub download_list: Vec<Vec<EpisodeLink>>,
    pub descriptor: MovieDescriptor,
}

/// Compact summary kept alongside each detail snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieBasicInfo {
    pub id: i64,
    pub cid: i64,
    pub pid: i64,
    pub name: String,
    pub sub_title: String,
    pub c_name: String,
    pub state: String,
    pub picture: String,
    pub actor: String,
    pub director: String,
    pub blurb: String,
    pub remarks: String,
    pub area: String,
    pub year: String,
}

impl From<&MovieDetail> for MovieBasicInfo {
    fn from(detail: &MovieDetail) -> Self {
        let d = &detail.descriptor;
        Self {
            id: detail.id,
            cid: detail.cid,
            pid: detail.pid,
            name: detail.name.clone(),
            sub_title: d.sub_title.clone(),
            c_name: d.c_name.clone(),
            state: d.state.clone(),
            picture: detail.picture.clone(),
            actor: d.actor.clone(),
            director: d.director.clone(),
            blurb: d.blurb.clone(),
            remarks: d.remarks.clone(),
            area: d.area.clone(),
            year: d.year.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_decodes_collector_json() {
        let raw = json!({
            "id": 42,
            "cid": 6,
            "pid": 1,
            "name": "Night Train",
            "playFrom": ["m3u8"],
            "DownFrom": "http",
            "playList": [[{"episode": "1", "link": "https://cdn/1.m3u8"}]],
            "descriptor": {
                "cName": "Action",
                "classTag": "Action/Thriller",
                "area": "USA/Canada",
                "language": "English",
                "year": "2021",
                "updateTime": "2023-04-05 06:07:08",
                "addTime": 1680000000,
                "dbId": 998877,
                "dbScore": "7.9"
            }
        });

        let detail: MovieDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.id, 42);
        assert_eq!(detail.play_list[0][0].episode, "1");
        assert_eq!(detail.descriptor.class_tag, "Action/Thriller");
        assert_eq!(detail.descriptor.db_id, 998877);
        assert!(detail.download_list.is_empty());
    }

    #[test]
    fn test_sparse_detail_defaults() {
        let detail: MovieDetail = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(detail.pid, 0);
        assert_eq!(detail.descriptor, MovieDescriptor::default());
    }

    #[test]
    fn test_listing_field_names() {
        let listing: MovieListing =
            serde_json::from_str(r#"{"id": 3, "cid": 7, "CName": "Drama", "enName": "x"}"#).unwrap();
        assert_eq!(listing.c_name, "Drama");
        assert_eq!(listing.en_name, "x");
    }

    #[test]
    fn test_basic_info_copies_fields() {
        let mut detail = MovieDetail {
            id: 9,
            cid: 2,
            pid: 1,
            name: "Harbor".to_string(),
            picture: "p.jpg".to_string(),
            ..Default::default()
        };
        detail.descriptor.area = "Japan".to_string();
        detail.descriptor.year = "2019".to_string();
        detail.descriptor.content = "not copied".to_string();

        let info = MovieBasicInfo::from(&detail);
        assert_eq!(info.id, 9);
        assert_eq!(info.picture, "p.jpg");
        assert_eq!(info.area, "Japan");
        assert_eq!(info.year, "2019");
    }
}

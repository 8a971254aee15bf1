//! Key layout for everything the indexer writes.
//!
//! Templates use `{cid}`, `{pid}` and `{id}` placeholders:
//!
//! ```text
//! MovieList:Cid{cid}              sorted set of listings, scored by movie id
//! MovieDetail:Cid{cid}:Id{id}     detail snapshot (string, expiring)
//! MovieBasicInfo:Cid{cid}:Id{id}  basic-info snapshot (string, expiring)
//! Search:SortByTime:Pid{pid}      search records scored by update time
//! Search:SortByScore:Pid{pid}     search records scored by rating
//! Search:SortByRank:Pid{pid}      search records scored by popularity id
//! Search:Keys:Pid{pid}            facet vocabulary hash
//! ```

use serde::Deserialize;

/// Key templates, overridable per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyTemplates {
    pub listing: String,
    pub detail: String,
    pub basic_info: String,
    pub time_index: String,
    pub score_index: String,
    pub rank_index: String,
    pub vocabulary: String,
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self {
            listing: "MovieList:Cid{cid}".to_string(),
            detail: "MovieDetail:Cid{cid}:Id{id}".to_string(),
            basic_info: "MovieBasicInfo:Cid{cid}:Id{id}".to_string(),
            time_index: "Search:SortByTime:Pid{pid}".to_string(),
            score_index: "Search:SortByScore:Pid{pid}".to_string(),
            rank_index: "Search:SortByRank:Pid{pid}".to_string(),
            vocabulary: "Search:Keys:Pid{pid}".to_string(),
        }
    }
}

/// Renders concrete keys from [`KeyTemplates`].
#[derive(Debug, Clone, Default)]
pub struct KeySpace {
    templates: KeyTemplates,
}

impl KeySpace {
    pub fn new(templates: KeyTemplates) -> Self {
        Self { templates }
    }

    pub fn listing(&self, cid: i64) -> String {
        render(&self.templates.listing, &[("cid", cid)])
    }

    pub fn detail(&self, cid: i64, id: i64) -> String {
        render(&self.templates.detail, &[("cid", cid), ("id", id)])
    }

    pub fn basic_info(&self, cid: i64, id: i64) -> String {
        render(&self.templates.basic_info, &[("cid", cid), ("id", id)])
    }

    pub fn time_index(&self, pid: i64) -> String {
        render(&self.templates.time_index, &[("pid", pid)])
    }

    pub fn score_index(&self, pid: i64) -> String {
        render(&self.templates.score_index, &[("pid", pid)])
    }

    pub fn rank_index(&self, pid: i64) -> String {
        render(&self.templates.rank_index, &[("pid", pid)])
    }

    pub fn vocabulary(&self, pid: i64) -> String {
        render(&self.templates.vocabulary, &[("pid", pid)])
    }
}

fn render(template: &str, params: &[(&str, i64)]) -> String {
    params.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), &value.to_string())
    })
}

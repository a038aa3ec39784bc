use crate::period::Period;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// One upstream chart record for an artist or album entry in one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChartEntry {
    pub name: String,
    pub playcount: u64,
}

// Merged cross-period record for one artist. Every period is present in
// `playcount_by_period` (0 when unlisted); a rank is present only when the
// artist made that period's top 6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistStat {
    pub name: String,
    pub overall_playcount: u64,
    pub playcount_by_period: BTreeMap<Period, u64>,
    pub rank_by_period: BTreeMap<Period, u32>,
}

// Per-period artist row as served to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistView {
    pub name: String,
    pub playcount: u64,
    pub overall_playcount: u64,
    pub rank: Option<u32>,
}

// Album art reference, kept in the upstream's size order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    #[serde(rename = "size", default)]
    pub size_tag: String,
    #[serde(rename = "#text", default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub name: String,
    pub artist_name: String,
    pub image_refs: Vec<ImageRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodChart {
    pub artists: Vec<ArtistView>,
    pub albums: Vec<AlbumSummary>,
}

// The full aggregation result for one request. Never cached server-side;
// rebuilt from upstream on every call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartBundle {
    pub user_summary: Value,
    pub per_period: BTreeMap<Period, PeriodChart>,
}

// One derived gameplay row. `level` can exceed 100 when the health period
// outgrows the comparison period; that is deliberate.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub hp: u64,
    pub max_hp: u64,
    pub level: u32,
    pub rank: Option<u32>,
}

// Saved-roster store shapes. The artists payload is presentation data
// (sprites and such) and is stored opaquely.
#[derive(Debug, Deserialize)]
pub struct SaveRosterRequest {
    pub username: Option<String>,
    pub artists: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SavedRoster {
    pub username: String,
    pub artists: Value,
}

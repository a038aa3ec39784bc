use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

use crate::metrics::UPSTREAM_ERRORS;
use crate::models::{AlbumSummary, ImageRef, RawChartEntry};
use crate::period::{Period, TimeRange};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(reqwest::Error),
}

// The four logical queries the pipeline needs from the stats provider.
// Split out as a trait so the aggregator can run against canned data.
#[allow(async_fn_in_trait)]
pub trait StatsProvider {
    async fn user_summary(&self, user: &str) -> Result<Value, UpstreamError>;
    async fn weekly_artist_chart(
        &self,
        user: &str,
        range: TimeRange,
    ) -> Result<Vec<RawChartEntry>, UpstreamError>;
    async fn top_artists(&self, user: &str, limit: u32) -> Result<Vec<RawChartEntry>, UpstreamError>;
    async fn top_albums(
        &self,
        user: &str,
        period: Option<Period>,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, UpstreamError>;
}

pub struct LastfmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl LastfmClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        user: &str,
        extra: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let mut params: Vec<(&str, String)> = vec![
            ("method", method.to_string()),
            ("user", user.to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
        ];
        params.extend_from_slice(extra);

        let result = self
            .client
            .get(&self.base_url)
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await;

        let res = match result {
            Ok(res) => res,
            Err(e) => {
                UPSTREAM_ERRORS.inc();
                return Err(UpstreamError::Request(e));
            }
        };
        if !res.status().is_success() {
            UPSTREAM_ERRORS.inc();
            return Err(UpstreamError::Status(res.status().as_u16()));
        }
        res.json::<T>().await.map_err(|e| {
            UPSTREAM_ERRORS.inc();
            UpstreamError::Parse(e)
        })
    }
}

impl StatsProvider for LastfmClient {
    async fn user_summary(&self, user: &str) -> Result<Value, UpstreamError> {
        let reply: UserInfoReply = self.call("user.getinfo", user, &[]).await?;
        Ok(reply.user.unwrap_or(Value::Null))
    }

    async fn weekly_artist_chart(
        &self,
        user: &str,
        range: TimeRange,
    ) -> Result<Vec<RawChartEntry>, UpstreamError> {
        let extra = [
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
        ];
        let reply: WeeklyChartReply = self
            .call("user.getweeklyartistchart", user, &extra)
            .await?;
        Ok(chart_entries(reply.weeklyartistchart.artist))
    }

    async fn top_artists(&self, user: &str, limit: u32) -> Result<Vec<RawChartEntry>, UpstreamError> {
        let extra = [("limit", limit.to_string())];
        let reply: TopArtistsReply = self.call("user.gettopartists", user, &extra).await?;
        Ok(chart_entries(reply.topartists.artist))
    }

    async fn top_albums(
        &self,
        user: &str,
        period: Option<Period>,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, UpstreamError> {
        let mut extra = vec![("limit", limit.to_string())];
        // no period param means the upstream's all-history default
        if let Some(p) = period {
            extra.push(("period", p.as_str().to_string()));
        }
        let reply: TopAlbumsReply = self.call("user.gettopalbums", user, &extra).await?;
        let mut albums: Vec<AlbumSummary> = reply
            .topalbums
            .album
            .into_iter()
            .map(|a| AlbumSummary {
                name: a.name,
                artist_name: a.artist.resolve(),
                image_refs: a.image,
            })
            .collect();
        albums.truncate(limit as usize);
        Ok(albums)
    }
}

fn chart_entries(raw: Vec<RawArtist>) -> Vec<RawChartEntry> {
    raw.into_iter()
        .map(|a| RawChartEntry {
            name: a.name,
            playcount: a.playcount,
        })
        .collect()
}

// Wire shapes. Last.fm is loose with types: playcounts arrive as strings,
// album artists as either {name} or {"#text"}, and any field can be
// missing. Absent numbers become 0 and absent names empty strings.

#[derive(Deserialize)]
struct UserInfoReply {
    #[serde(default)]
    user: Option<Value>,
}

#[derive(Deserialize)]
struct WeeklyChartReply {
    #[serde(default)]
    weeklyartistchart: ArtistListBlock,
}

#[derive(Deserialize)]
struct TopArtistsReply {
    #[serde(default)]
    topartists: ArtistListBlock,
}

#[derive(Deserialize, Default)]
struct ArtistListBlock {
    #[serde(default)]
    artist: Vec<RawArtist>,
}

#[derive(Deserialize)]
struct RawArtist {
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    playcount: u64,
}

#[derive(Deserialize)]
struct TopAlbumsReply {
    #[serde(default)]
    topalbums: AlbumListBlock,
}

#[derive(Deserialize, Default)]
struct AlbumListBlock {
    #[serde(default)]
    album: Vec<RawAlbum>,
}

#[derive(Deserialize)]
struct RawAlbum {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artist: RawAlbumArtist,
    #[serde(default)]
    image: Vec<ImageRef>,
}

#[derive(Deserialize, Default)]
struct RawAlbumArtist {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "#text")]
    text: String,
}

impl RawAlbumArtist {
    fn resolve(self) -> String {
        if !self.name.is_empty() { self.name } else { self.text }
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::String(s) => s.parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

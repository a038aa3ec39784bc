use std::collections::BTreeMap;

use crate::lastfm::{StatsProvider, UpstreamError};
use crate::models::{ArtistStat, ArtistView, ChartBundle, PeriodChart, RawChartEntry};
use crate::period::{Period, ranges};

// Top-6 cutoff per period, 8 albums per period, and the upstream cap on the
// all-history artist chart
pub const TOP_ARTISTS: usize = 6;
pub const ALBUM_LIMIT: u32 = 8;
const OVERALL_CHART_LIMIT: u32 = 1000;

// Builds the cross-period bundle for one user. All-or-nothing: the first
// upstream failure aborts the whole call and no partial bundle escapes.
//
// The rolling-period artist lists carry the full union of every period's
// top 6 (zero-filled where a name is unlisted) so a roster comparing two
// periods never drops a name one of them doesn't know. The `overall` list
// is just the all-time top 6, ranks 1..6.
pub async fn aggregate<P: StatsProvider>(
    provider: &P,
    user: &str,
    now: i64,
) -> Result<ChartBundle, UpstreamError> {
    let user_summary = provider.user_summary(user).await?;

    // one chart per rolling period, each stable-sorted descending so ties
    // keep the upstream's relative order
    let mut period_charts: Vec<(Period, Vec<RawChartEntry>)> = Vec::with_capacity(5);
    for (period, range) in ranges(now) {
        let mut chart = provider.weekly_artist_chart(user, range).await?;
        sort_by_playcount(&mut chart);
        period_charts.push((period, chart));
    }

    let mut overall_chart = provider.top_artists(user, OVERALL_CHART_LIMIT).await?;
    sort_by_playcount(&mut overall_chart);

    let overall_top: Vec<String> = overall_chart
        .iter()
        .take(TOP_ARTISTS)
        .map(|e| e.name.clone())
        .collect();

    // union of every top-6, in encounter order: shortest window first,
    // all-time last. Order matters for deterministic output.
    let mut union: Vec<String> = Vec::new();
    for (_, chart) in &period_charts {
        for entry in chart.iter().take(TOP_ARTISTS) {
            push_unique(&mut union, &entry.name);
        }
    }
    for name in &overall_top {
        push_unique(&mut union, name);
    }

    let stats: Vec<ArtistStat> = union
        .iter()
        .map(|name| merge_artist(name, &period_charts, &overall_chart, &overall_top))
        .collect();

    let mut per_period: BTreeMap<Period, PeriodChart> = BTreeMap::new();
    for period in Period::ALL {
        let artists = if period == Period::Overall {
            // all-time view: exactly the all-time top 6, in rank order
            overall_top
                .iter()
                .map(|name| {
                    let stat = stats.iter().find(|s| &s.name == name).unwrap();
                    artist_view(stat, period)
                })
                .collect()
        } else {
            // rolling view: the full union, in union order; rank only for
            // this period's top 6
            stats.iter().map(|s| artist_view(s, period)).collect()
        };

        let album_period = if period == Period::Overall { None } else { Some(period) };
        let albums = provider.top_albums(user, album_period, ALBUM_LIMIT).await?;

        per_period.insert(period, PeriodChart { artists, albums });
    }

    Ok(ChartBundle {
        user_summary,
        per_period,
    })
}

fn sort_by_playcount(chart: &mut [RawChartEntry]) {
    // sort_by is stable; equal playcounts keep upstream order
    chart.sort_by(|a, b| b.playcount.cmp(&a.playcount));
}

fn push_unique(union: &mut Vec<String>, name: &str) {
    if !union.iter().any(|n| n == name) {
        union.push(name.to_string());
    }
}

fn merge_artist(
    name: &str,
    period_charts: &[(Period, Vec<RawChartEntry>)],
    overall_chart: &[RawChartEntry],
    overall_top: &[String],
) -> ArtistStat {
    let overall_playcount = overall_chart
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.playcount)
        .unwrap_or(0);

    let mut playcount_by_period = BTreeMap::new();
    let mut rank_by_period = BTreeMap::new();

    for (period, chart) in period_charts {
        let playcount = chart
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.playcount)
            .unwrap_or(0);
        playcount_by_period.insert(*period, playcount);

        if let Some(pos) = chart.iter().take(TOP_ARTISTS).position(|e| e.name == name) {
            rank_by_period.insert(*period, pos as u32 + 1);
        }
    }

    playcount_by_period.insert(Period::Overall, overall_playcount);
    if let Some(pos) = overall_top.iter().position(|n| n == name) {
        rank_by_period.insert(Period::Overall, pos as u32 + 1);
    }

    ArtistStat {
        name: name.to_string(),
        overall_playcount,
        playcount_by_period,
        rank_by_period,
    }
}

fn artist_view(stat: &ArtistStat, period: Period) -> ArtistView {
    ArtistView {
        name: stat.name.clone(),
        playcount: stat.playcount_by_period.get(&period).copied().unwrap_or(0),
        overall_playcount: stat.overall_playcount,
        rank: stat.rank_by_period.get(&period).copied(),
    }
}

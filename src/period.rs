use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// The six reporting windows Last.fm understands. Ordered by window length,
// with `overall` (all history) last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7day")]
    SevenDay,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3month")]
    ThreeMonth,
    #[serde(rename = "6month")]
    SixMonth,
    #[serde(rename = "12month")]
    TwelveMonth,
    #[serde(rename = "overall")]
    Overall,
}

// Absolute window in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::SevenDay,
        Period::OneMonth,
        Period::ThreeMonth,
        Period::SixMonth,
        Period::TwelveMonth,
        Period::Overall,
    ];

    pub const ROLLING: [Period; 5] = [
        Period::SevenDay,
        Period::OneMonth,
        Period::ThreeMonth,
        Period::SixMonth,
        Period::TwelveMonth,
    ];

    // Fixed day counts matching Last.fm's own windowing (30/90/180/365,
    // not calendar months). `overall` has no window.
    pub fn days(self) -> Option<i64> {
        match self {
            Period::SevenDay => Some(7),
            Period::OneMonth => Some(30),
            Period::ThreeMonth => Some(90),
            Period::SixMonth => Some(180),
            Period::TwelveMonth => Some(365),
            Period::Overall => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::SevenDay => "7day",
            Period::OneMonth => "1month",
            Period::ThreeMonth => "3month",
            Period::SixMonth => "6month",
            Period::TwelveMonth => "12month",
            Period::Overall => "overall",
        }
    }

    // Window ending at `now` (unix seconds); None for `overall`
    pub fn range(self, now: i64) -> Option<TimeRange> {
        self.days().map(|d| TimeRange {
            from: now - d * 86400,
            to: now,
        })
    }
}

// Ranges for the five rolling periods, in window-length order
pub fn ranges(now: i64) -> [(Period, TimeRange); 5] {
    Period::ROLLING.map(|p| {
        let range = p.range(now).unwrap();
        (p, range)
    })
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7day" => Ok(Period::SevenDay),
            "1month" => Ok(Period::OneMonth),
            "3month" => Ok(Period::ThreeMonth),
            "6month" => Ok(Period::SixMonth),
            "12month" => Ok(Period::TwelveMonth),
            "overall" => Ok(Period::Overall),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

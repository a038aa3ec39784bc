use crate::models::{ArtistView, ChartBundle, RosterEntry};
use crate::period::Period;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeriveError {
    #[error("comparison period '{comparison}' must be longer than '{current}' or overall")]
    ComparisonTooShort { current: Period, comparison: Period },
    #[error("health period must be a rolling period")]
    HealthNotRolling,
    #[error("health period must match the current period for rolling views")]
    HealthMismatch,
}

// A validated period triple for roster derivation. For a rolling current
// period the health period is the current period itself; for `overall` it
// is any rolling period, defaulting to the shortest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSelection {
    pub current: Period,
    pub comparison: Period,
    pub health: Period,
}

impl RosterSelection {
    pub fn new(
        current: Period,
        comparison: Period,
        health: Option<Period>,
    ) -> Result<Self, DeriveError> {
        if comparison != Period::Overall {
            let longer = match (current.days(), comparison.days()) {
                (Some(current_days), Some(comparison_days)) => comparison_days > current_days,
                // nothing is longer than all history
                _ => false,
            };
            if !longer {
                return Err(DeriveError::ComparisonTooShort {
                    current,
                    comparison,
                });
            }
        }

        let health = if current == Period::Overall {
            let health = health.unwrap_or(Period::SevenDay);
            if health == Period::Overall {
                return Err(DeriveError::HealthNotRolling);
            }
            health
        } else {
            match health {
                Some(h) if h != current => return Err(DeriveError::HealthMismatch),
                _ => current,
            }
        };

        Ok(Self {
            current,
            comparison,
            health,
        })
    }
}

// Turns a bundle into the gameplay roster: the current period's ranked
// artists (its top 6), each with hp from the health period and maxHp from
// the comparison period. Entry order follows the bundle's order for the
// current period; rank is carried for display only.
pub fn derive(bundle: &ChartBundle, selection: &RosterSelection) -> Vec<RosterEntry> {
    let current_artists = period_artists(bundle, selection.current);
    let health_artists = period_artists(bundle, selection.health);
    let comparison_artists = period_artists(bundle, selection.comparison);

    current_artists
        .iter()
        .filter(|a| a.rank.is_some())
        .map(|artist| {
            let hp = playcount_of(health_artists, &artist.name).unwrap_or(0);

            let mut max_hp = if selection.comparison == Period::Overall {
                artist.overall_playcount
            } else {
                playcount_of(comparison_artists, &artist.name)
                    .unwrap_or(artist.overall_playcount)
            };
            // a missing or empty comparison value falls back to the
            // all-time count, then to 1 so maxHp stays positive
            if max_hp == 0 {
                max_hp = artist.overall_playcount;
            }
            if max_hp == 0 {
                max_hp = 1;
            }

            // no upper clamp: hp above maxHp legitimately pushes the level
            // past 100
            let level = (hp.saturating_mul(100) / max_hp).max(1);

            RosterEntry {
                name: artist.name.clone(),
                hp,
                max_hp,
                level: u32::try_from(level).unwrap_or(u32::MAX),
                rank: artist.rank,
            }
        })
        .collect()
}

fn period_artists(bundle: &ChartBundle, period: Period) -> &[ArtistView] {
    bundle
        .per_period
        .get(&period)
        .map(|chart| chart.artists.as_slice())
        .unwrap_or(&[])
}

fn playcount_of(artists: &[ArtistView], name: &str) -> Option<u64> {
    artists.iter().find(|a| a.name == name).map(|a| a.playcount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodChart;
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn view(name: &str, playcount: u64, overall_playcount: u64, rank: Option<u32>) -> ArtistView {
        ArtistView {
            name: name.to_string(),
            playcount,
            overall_playcount,
            rank,
        }
    }

    // Artist "A": 7day 50 (rank 1), 1month 80 (unranked there), overall 500
    fn bundle() -> ChartBundle {
        let mut per_period = BTreeMap::new();
        per_period.insert(
            Period::SevenDay,
            PeriodChart {
                artists: vec![view("A", 50, 500, Some(1))],
                albums: vec![],
            },
        );
        per_period.insert(
            Period::OneMonth,
            PeriodChart {
                artists: vec![view("A", 80, 500, None)],
                albums: vec![],
            },
        );
        per_period.insert(
            Period::Overall,
            PeriodChart {
                artists: vec![view("A", 500, 500, Some(1))],
                albums: vec![],
            },
        );
        ChartBundle {
            user_summary: Value::Null,
            per_period,
        }
    }

    fn select(current: Period, comparison: Period) -> RosterSelection {
        RosterSelection::new(current, comparison, None).unwrap()
    }

    #[test]
    fn test_level_against_next_period() {
        let roster = derive(&bundle(), &select(Period::SevenDay, Period::OneMonth));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].hp, 50);
        assert_eq!(roster[0].max_hp, 80);
        assert_eq!(roster[0].level, 62);
        assert_eq!(roster[0].rank, Some(1));
    }

    #[test]
    fn test_level_against_overall() {
        let roster = derive(&bundle(), &select(Period::SevenDay, Period::Overall));
        assert_eq!(roster[0].max_hp, 500);
        assert_eq!(roster[0].level, 10);
    }

    #[test]
    fn test_full_health_is_level_100() {
        let mut bundle = bundle();
        bundle
            .per_period
            .get_mut(&Period::OneMonth)
            .unwrap()
            .artists[0]
            .playcount = 50;
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        assert_eq!(roster[0].level, 100);
    }

    #[test]
    fn test_zero_hp_is_level_1() {
        let mut bundle = bundle();
        bundle
            .per_period
            .get_mut(&Period::SevenDay)
            .unwrap()
            .artists[0]
            .playcount = 0;
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        assert_eq!(roster[0].hp, 0);
        assert_eq!(roster[0].level, 1);
    }

    #[test]
    fn test_level_above_100_is_not_clamped() {
        let mut bundle = bundle();
        // comparison window reports fewer plays than the health window
        bundle
            .per_period
            .get_mut(&Period::OneMonth)
            .unwrap()
            .artists[0]
            .playcount = 25;
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        assert_eq!(roster[0].level, 200);
    }

    #[test]
    fn test_unranked_artists_are_dropped() {
        let mut bundle = bundle();
        bundle
            .per_period
            .get_mut(&Period::SevenDay)
            .unwrap()
            .artists
            .push(view("B", 10, 30, None));
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "A");
    }

    #[test]
    fn test_missing_comparison_falls_back_to_overall_then_one() {
        let mut bundle = bundle();
        // B is ranked in 7day but unknown to the 1month view
        bundle
            .per_period
            .get_mut(&Period::SevenDay)
            .unwrap()
            .artists
            .push(view("B", 10, 30, Some(2)));
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        let b = roster.iter().find(|e| e.name == "B").unwrap();
        assert_eq!(b.max_hp, 30);

        // no plays anywhere: maxHp bottoms out at 1 and level at 1
        bundle
            .per_period
            .get_mut(&Period::SevenDay)
            .unwrap()
            .artists[1] = view("B", 0, 0, Some(2));
        let roster = derive(&bundle, &select(Period::SevenDay, Period::OneMonth));
        let b = roster.iter().find(|e| e.name == "B").unwrap();
        assert_eq!(b.max_hp, 1);
        assert_eq!(b.level, 1);
    }

    #[test]
    fn test_overall_roster_uses_health_period_hp() {
        let selection =
            RosterSelection::new(Period::Overall, Period::Overall, Some(Period::SevenDay)).unwrap();
        let roster = derive(&bundle(), &selection);
        assert_eq!(roster[0].hp, 50);
        assert_eq!(roster[0].max_hp, 500);
        assert_eq!(roster[0].level, 10);
    }

    #[test]
    fn test_overall_health_defaults_to_seven_day() {
        let selection = RosterSelection::new(Period::Overall, Period::Overall, None).unwrap();
        assert_eq!(selection.health, Period::SevenDay);
    }

    #[test]
    fn test_selection_validation() {
        // comparison must be strictly longer, or overall
        assert!(RosterSelection::new(Period::OneMonth, Period::SevenDay, None).is_err());
        assert!(RosterSelection::new(Period::OneMonth, Period::OneMonth, None).is_err());
        assert!(RosterSelection::new(Period::OneMonth, Period::ThreeMonth, None).is_ok());
        assert!(RosterSelection::new(Period::OneMonth, Period::Overall, None).is_ok());

        // nothing is longer than all history
        assert!(RosterSelection::new(Period::Overall, Period::TwelveMonth, None).is_err());
        assert!(RosterSelection::new(Period::Overall, Period::Overall, None).is_ok());

        // health is pinned to the current rolling period
        assert_eq!(
            RosterSelection::new(Period::SevenDay, Period::Overall, Some(Period::OneMonth)),
            Err(DeriveError::HealthMismatch)
        );
        // and must be rolling for the all-time view
        assert_eq!(
            RosterSelection::new(Period::Overall, Period::Overall, Some(Period::Overall)),
            Err(DeriveError::HealthNotRolling)
        );
    }
}

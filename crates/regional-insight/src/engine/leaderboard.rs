use super::domain::{Presence, VillageRecord};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    InfectiousCases,
    EconomicActivity,
}

impl LeaderboardMetric {
    pub const fn ordered() -> [Self; 2] {
        [Self::InfectiousCases, Self::EconomicActivity]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::InfectiousCases => "infectious_cases",
            Self::EconomicActivity => "economic_activity",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InfectiousCases => "Highest Infectious Cases",
            Self::EconomicActivity => "Most Economic Activity",
        }
    }

    pub fn value(self, record: &VillageRecord) -> f64 {
        match self {
            Self::InfectiousCases => record.disease.infectious_cases,
            Self::EconomicActivity => record.economy.activity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown leaderboard '{0}', expected infectious_cases or economic_activity")]
pub struct MetricParseError(pub String);

impl FromStr for LeaderboardMetric {
    type Err = MetricParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "infectious_cases" | "risk" => Ok(Self::InfectiousCases),
            "economic_activity" | "economy" => Ok(Self::EconomicActivity),
            _ => Err(MetricParseError(value.to_string())),
        }
    }
}

/// The `n` highest-scoring villages, highest first. Equal scores keep snapshot order.
pub fn top_n<F>(records: &[VillageRecord], metric: F, n: usize) -> Vec<&VillageRecord>
where
    F: Fn(&VillageRecord) -> f64,
{
    let mut scored: Vec<(f64, &VillageRecord)> = records
        .iter()
        .map(|record| (sortable(metric(record)), record))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(n).map(|(_, record)| record).collect()
}

// NaN sinks below every real score and -0.0 folds into 0.0 so ties stay ties.
fn sortable(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value + 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub village_id: String,
    pub name: String,
    pub district: String,
    pub value: f64,
    /// Early-warning system status, shown beside each village on the risk board.
    pub warning_system: Presence,
    pub warning_system_label: &'static str,
}

pub fn leaderboard(
    records: &[VillageRecord],
    metric: LeaderboardMetric,
    n: usize,
) -> Vec<LeaderboardEntry> {
    top_n(records, |record| metric.value(record), n)
        .into_iter()
        .enumerate()
        .map(|(idx, record)| LeaderboardEntry {
            rank: idx + 1,
            village_id: record.id.clone(),
            name: record.name.clone(),
            district: record.district.clone(),
            value: metric.value(record),
            warning_system: record.disaster.warning_system,
            warning_system_label: record.disaster.warning_system.label(),
        })
        .collect()
}

use super::disease::{regional_disease_burden, DiseaseBurden};
use super::domain::VillageRecord;
use super::indicators::{
    aggregate, electricity_coverage, income_distribution, CategoryCount, DerivedIndicatorSet,
};
use super::leaderboard::{leaderboard, LeaderboardEntry, LeaderboardMetric};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardView {
    pub metric: LeaderboardMetric,
    pub label: &'static str,
    pub entries: Vec<LeaderboardEntry>,
}

/// Everything the regional dashboard shows above the map, computed in one pass over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalOverview {
    pub village_count: usize,
    pub indicators: DerivedIndicatorSet,
    pub leaderboards: Vec<LeaderboardView>,
    pub income_distribution: Vec<CategoryCount>,
    pub electricity_coverage: Vec<CategoryCount>,
    pub diseases: Vec<DiseaseBurden>,
}

pub fn overview(records: &[VillageRecord], leaderboard_size: usize) -> RegionalOverview {
    let leaderboards = LeaderboardMetric::ordered()
        .into_iter()
        .map(|metric| LeaderboardView {
            metric,
            label: metric.label(),
            entries: leaderboard(records, metric, leaderboard_size),
        })
        .collect();

    RegionalOverview {
        village_count: records.len(),
        indicators: aggregate(records),
        leaderboards,
        income_distribution: income_distribution(records),
        electricity_coverage: electricity_coverage(records),
        diseases: regional_disease_burden(records),
    }
}

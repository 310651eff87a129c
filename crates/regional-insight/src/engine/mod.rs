//! Pure computations over a snapshot of village records. Nothing here performs I/O, logs, or
//! keeps state between calls.

pub mod disease;
pub mod domain;
pub mod indicators;
pub mod leaderboard;
pub mod lens;
pub mod overview;
pub mod profile;
pub mod resilience;
pub mod resolver;
pub mod search;

pub use disease::{
    case_fatality_ratio, disease_burden, regional_disease_burden, CfrBand, Disease, DiseaseBurden,
};
pub use domain::{DomainBlock, Presence, RecordError, VillageRecord};
pub use indicators::{
    aggregate, electricity_coverage, income_distribution, sum_field, CategoryCount,
    DerivedIndicatorSet, Indicator, IndicatorDetail, IndicatorKind,
};
pub use leaderboard::{leaderboard, top_n, LeaderboardEntry, LeaderboardMetric, MetricParseError};
pub use lens::{
    classify, classify_all, tally, ClassificationResult, ColorTier, Lens, LensParseError, TierTally,
};
pub use overview::{overview, LeaderboardView, RegionalOverview};
pub use profile::{
    medical_ratio, profile, signal_score, Hazard, HazardExposure, MedicalStaffing, SchoolCount,
    VillageProfile,
};
pub use resilience::{
    score, score_all, score_with, Quadrant, ReadinessModel, ResiliencePoint, DISPLAY_FREQUENCY_CAP,
};
pub use search::{search, SEARCH_LIMIT};

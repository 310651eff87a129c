use super::domain::VillageRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Infectious case count above which the risk lens raises an alert.
pub const INFECTIOUS_ALERT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    #[default]
    Risk,
    Digital,
    Economy,
}

impl Lens {
    pub const fn ordered() -> [Self; 3] {
        [Self::Risk, Self::Digital, Self::Economy]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Digital => "digital",
            Self::Economy => "economy",
        }
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lens '{0}', expected one of: risk, digital, economy")]
pub struct LensParseError(pub String);

impl FromStr for Lens {
    type Err = LensParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "risk" => Ok(Self::Risk),
            "digital" => Ok(Self::Digital),
            "economy" => Ok(Self::Economy),
            _ => Err(LensParseError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    Alert,
    Warning,
    Neutral,
    Positive,
}

impl ColorTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Alert, Self::Warning, Self::Neutral, Self::Positive]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Alert => "Alert",
            Self::Warning => "Warning",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub village_id: String,
    pub lens: Lens,
    pub tier: ColorTier,
    pub emphasis: bool,
    /// Marker weight for the renderer; emphasised markers are drawn larger.
    pub weight: u8,
}

pub fn classify(record: &VillageRecord, lens: Lens) -> ClassificationResult {
    let (tier, emphasis, weight) = match lens {
        Lens::Risk => {
            let at_risk = record.disaster.disaster_exist.is_present()
                || record.disease.infectious_cases > INFECTIOUS_ALERT_THRESHOLD;
            if at_risk {
                (ColorTier::Alert, true, 6)
            } else {
                (ColorTier::Positive, false, 4)
            }
        }
        Lens::Digital => {
            if record.digital.village_information_system.is_present() {
                (ColorTier::Positive, true, 6)
            } else {
                (ColorTier::Warning, false, 4)
            }
        }
        Lens::Economy => {
            if record.economy.markets > 0.0 || record.economy.bumdes > 0.0 {
                (ColorTier::Positive, true, 6)
            } else {
                (ColorTier::Neutral, false, 3)
            }
        }
    };

    ClassificationResult {
        village_id: record.id.clone(),
        lens,
        tier,
        emphasis,
        weight,
    }
}

pub fn classify_all(records: &[VillageRecord], lens: Lens) -> Vec<ClassificationResult> {
    records.iter().map(|record| classify(record, lens)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierTally {
    pub tier: ColorTier,
    pub tier_label: &'static str,
    pub villages: usize,
}

/// Villages per tier in [`ColorTier::ordered`] order, skipping empty tiers.
pub fn tally(results: &[ClassificationResult]) -> Vec<TierTally> {
    ColorTier::ordered()
        .into_iter()
        .filter_map(|tier| {
            let villages = results.iter().filter(|result| result.tier == tier).count();
            (villages > 0).then_some(TierTally {
                tier,
                tier_label: tier.label(),
                villages,
            })
        })
        .collect()
}

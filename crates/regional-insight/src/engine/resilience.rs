use super::domain::{Presence, VillageRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::Range;

/// Readiness band for villages with a working early-warning system.
pub const PREPARED_BAND: Range<f64> = 80.0..100.0;
/// Readiness band for villages without one.
pub const UNPREPARED_BAND: Range<f64> = 10.0..40.0;
/// Flood-exposed villages below this readiness are in danger.
pub const DANGER_READINESS: f64 = 60.0;

/// How a readiness value is drawn from its band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "model")]
pub enum ReadinessModel {
    /// Band midpoint, so the same record always scores the same.
    #[default]
    Midpoint,
    /// Uniform draw seeded per village, reproducible for a given seed.
    Seeded { seed: u64 },
}

impl ReadinessModel {
    pub fn readiness(self, village_id: &str, warning_system: Presence) -> f64 {
        let band = if warning_system.is_present() {
            PREPARED_BAND
        } else {
            UNPREPARED_BAND
        };

        match self {
            Self::Midpoint => (band.start + band.end) / 2.0,
            Self::Seeded { seed } => {
                let mut rng = StdRng::seed_from_u64(seed ^ stable_id_hash(village_id));
                rng.gen_range(band)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Safe,
    Resilient,
    Danger,
}

impl Quadrant {
    pub const fn ordered() -> [Self; 3] {
        [Self::Safe, Self::Resilient, Self::Danger]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Resilient => "Resilient",
            Self::Danger => "Danger",
        }
    }
}

/// Frequency beyond which the chart axis stops growing.
pub const DISPLAY_FREQUENCY_CAP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResiliencePoint {
    pub village_id: String,
    /// Raw disaster frequency, never clamped.
    pub frequency: f64,
    /// Frequency capped at [`DISPLAY_FREQUENCY_CAP`] for chart axes.
    pub display_frequency: f64,
    pub readiness: f64,
    pub quadrant: Quadrant,
}

pub fn quadrant(frequency: f64, readiness: f64) -> Quadrant {
    if frequency == 0.0 {
        Quadrant::Safe
    } else if readiness < DANGER_READINESS {
        Quadrant::Danger
    } else {
        Quadrant::Resilient
    }
}

/// Scores a village with the deterministic [`ReadinessModel::Midpoint`].
pub fn score(record: &VillageRecord) -> ResiliencePoint {
    score_with(record, ReadinessModel::Midpoint)
}

pub fn score_with(record: &VillageRecord, model: ReadinessModel) -> ResiliencePoint {
    let frequency = record.disaster.flood;
    let readiness = model.readiness(&record.id, record.disaster.warning_system);

    ResiliencePoint {
        village_id: record.id.clone(),
        frequency,
        display_frequency: frequency.min(DISPLAY_FREQUENCY_CAP),
        readiness,
        quadrant: quadrant(frequency, readiness),
    }
}

pub fn score_all(records: &[VillageRecord], model: ReadinessModel) -> Vec<ResiliencePoint> {
    records
        .iter()
        .map(|record| score_with(record, model))
        .collect()
}

// FNV-1a; stable across builds, unlike the std hasher.
fn stable_id_hash(value: &str) -> u64 {
    value.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn village(id: &str, disaster: serde_json::Value) -> VillageRecord {
        VillageRecord::from_value(json!({ "id": id, "disaster": disaster })).expect("valid village")
    }

    #[test]
    fn no_floods_is_always_safe() {
        let unprepared = score(&village("a", json!({ "flood": 0 })));
        assert_eq!(unprepared.quadrant, Quadrant::Safe);

        for seed in [0_u64, 7, 42, u64::MAX] {
            let point = score_with(
                &village("b", json!({ "flood": 0, "warning_system": "tidak" })),
                ReadinessModel::Seeded { seed },
            );
            assert_eq!(point.quadrant, Quadrant::Safe);
        }
    }

    #[test]
    fn midpoint_readiness_splits_resilient_and_danger() {
        let prepared = score(&village("a", json!({ "flood": 3, "warning_system": "Ada" })));
        assert_eq!(prepared.readiness, 90.0);
        assert_eq!(prepared.quadrant, Quadrant::Resilient);

        let exposed = score(&village("b", json!({ "flood": 3 })));
        assert_eq!(exposed.readiness, 25.0);
        assert_eq!(exposed.quadrant, Quadrant::Danger);
    }

    #[test]
    fn seeded_readiness_is_reproducible_and_stays_in_band() {
        let record = village("1101012001", json!({ "flood": 2, "warning_system": "ada" }));
        let model = ReadinessModel::Seeded { seed: 99 };

        let first = score_with(&record, model);
        let second = score_with(&record, model);
        assert_eq!(first, second);
        assert!(PREPARED_BAND.contains(&first.readiness));
        assert_eq!(first.quadrant, Quadrant::Resilient);
    }

    #[test]
    fn frequency_is_unclamped_but_display_is_capped() {
        let point = score(&village("a", json!({ "flood": 14 })));
        assert_eq!(point.frequency, 14.0);
        assert_eq!(point.display_frequency, 10.0);
    }
}

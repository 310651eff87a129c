//! Single-village drill-down: facility breakdowns, energy mix, connectivity and hazard exposure,
//! plus every per-village engine output for the same record.
//!
//! Facility tables cover blocks the typed schema does not model, so they go through the field
//! resolver.

use super::disease::{disease_burden, DiseaseBurden};
use super::domain::{DisasterBlock, Presence, VillageRecord};
use super::lens::{classify, ClassificationResult, Lens};
use super::resilience::{score_with, ReadinessModel, ResiliencePoint};
use serde::Serialize;

struct Facet {
    label: &'static str,
    paths: &'static [&'static str],
}

const HEALTH_FACILITIES: &[Facet] = &[
    Facet {
        label: "Hospital",
        paths: &["health.jumlah_rumah_sakit"],
    },
    Facet {
        label: "Puskesmas",
        paths: &["health.jumlah_puskesmas"],
    },
    Facet {
        label: "Clinic",
        paths: &["health.jumlah_klinik"],
    },
    Facet {
        label: "Community Health Post",
        paths: &["health.jumlah_faskes_masyarakat"],
    },
    Facet {
        label: "Pharmacy",
        paths: &["health.jumlah_farmasi"],
    },
];

const ECONOMIC_FACILITIES: &[Facet] = &[
    Facet {
        label: "Markets",
        paths: &["economy.markets"],
    },
    Facet {
        label: "Grocery",
        paths: &["economy.grocery"],
    },
    Facet {
        label: "Eateries",
        paths: &["economy.eatery", "economy.restaurant"],
    },
    Facet {
        label: "Hotels",
        paths: &["economy.hotels"],
    },
    Facet {
        label: "Banks",
        paths: &["economy.banks", "economy.bank"],
    },
    Facet {
        label: "Cooperatives",
        paths: &["economy.cooperatives"],
    },
    Facet {
        label: "BUMDes",
        paths: &["economy.bumdes"],
    },
];

const WORSHIP_PLACES: &[Facet] = &[
    Facet {
        label: "Mosque",
        paths: &["social.mosque"],
    },
    Facet {
        label: "Musala",
        paths: &["social.musala"],
    },
    Facet {
        label: "Protestant Church",
        paths: &["social.church_christian"],
    },
    Facet {
        label: "Catholic Church",
        paths: &["social.church_catholic"],
    },
];

const CRIMINAL_INCIDENTS: &[(&str, &str, &str)] = &[
    (
        "Suicide",
        "criminal.suicide_count_man",
        "criminal.suicide_count_woman",
    ),
    (
        "Murder",
        "criminal.murderer_case_man",
        "criminal.murderer_case_woman",
    ),
];

// (level, state school path, private school path)
const EDUCATION_LEVELS: &[(&str, &str, &str)] = &[
    ("SD", "education.sd_negeri", "education.sd_swasta"),
    ("MI", "education.mi_negeri", "education.mi_swasta"),
    ("SMP", "education.smp_negeri", "education.smp_swasta"),
    ("MTs", "education.mts_negeri", "education.mts_swasta"),
    ("SMA", "education.sma_negeri", "education.sma_swasta"),
    ("MA", "education.ma_negeri", "education.ma_swasta"),
    ("SMK", "education.smk_negeri", "education.smk_swasta"),
    (
        "PT",
        "education.universities_negeri",
        "education.universities_swasta",
    ),
];

const DOCTORS_PATH: &str = "health.jumlah_dokter";
const MIDWIVES_PATH: &str = "health.jumlah_bidan";
const HEALTH_FACILITY_TOTAL_PATH: &str = "health.total_fasilitas_kesehatan";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityCount {
    pub label: &'static str,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitCount {
    pub label: &'static str,
    pub male: f64,
    pub female: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolCount {
    pub label: &'static str,
    pub state: f64,
    pub private: f64,
}

/// Health workers per facility: doctors plus midwives over the reported facility total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalStaffing {
    pub doctors: f64,
    pub midwives: f64,
    pub facilities: f64,
    pub ratio: f64,
}

impl MedicalStaffing {
    pub fn from_record(record: &VillageRecord) -> Self {
        let doctors = record.resolve(DOCTORS_PATH);
        let midwives = record.resolve(MIDWIVES_PATH);
        let facilities = record.resolve(HEALTH_FACILITY_TOTAL_PATH);

        Self {
            doctors,
            midwives,
            facilities,
            ratio: medical_ratio(doctors + midwives, facilities),
        }
    }
}

/// Staff per facility rounded to one decimal; zero when no facilities are reported.
pub fn medical_ratio(staff: f64, facilities: f64) -> f64 {
    if facilities > 0.0 {
        (staff / facilities * 10.0).round() / 10.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Flood,
    Landslide,
    Earthquake,
    TidalWave,
    Drought,
}

impl Hazard {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Flood,
            Self::Landslide,
            Self::Earthquake,
            Self::TidalWave,
            Self::Drought,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Landslide => "Landslide",
            Self::Earthquake => "Earthquake",
            Self::TidalWave => "Tidal Wave",
            Self::Drought => "Drought",
        }
    }

    pub fn presence(self, block: &DisasterBlock) -> Presence {
        match self {
            Self::Flood => block.flood_exist,
            Self::Landslide => block.landslide_exist,
            Self::Earthquake => block.earthquake_exist,
            Self::TidalWave => block.tsunami_exist,
            Self::Drought => block.drought_exist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardExposure {
    pub hazard: Hazard,
    pub label: &'static str,
    pub presence: Presence,
    pub presence_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillageProfile {
    pub village_id: String,
    pub name: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub health_facilities: Vec<FacilityCount>,
    pub medical_staffing: MedicalStaffing,
    pub economic_facilities: Vec<FacilityCount>,
    pub education: Vec<SchoolCount>,
    pub worship_places: Vec<FacilityCount>,
    pub criminal_incidents: Vec<SplitCount>,
    pub energy_mix: Vec<FacilityCount>,
    pub signal_score: u8,
    pub hazards: Vec<HazardExposure>,
    pub diseases: Vec<DiseaseBurden>,
    pub classifications: Vec<ClassificationResult>,
    pub resilience: ResiliencePoint,
}

pub fn profile(record: &VillageRecord, readiness: ReadinessModel) -> VillageProfile {
    VillageProfile {
        village_id: record.id.clone(),
        name: record.name.clone(),
        district: record.district.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
        health_facilities: facets(record, HEALTH_FACILITIES),
        medical_staffing: MedicalStaffing::from_record(record),
        economic_facilities: facets(record, ECONOMIC_FACILITIES),
        education: EDUCATION_LEVELS
            .iter()
            .map(|&(label, state, private)| SchoolCount {
                label,
                state: record.resolve(state),
                private: record.resolve(private),
            })
            .collect(),
        worship_places: facets(record, WORSHIP_PLACES),
        criminal_incidents: CRIMINAL_INCIDENTS
            .iter()
            .map(|&(label, male, female)| SplitCount {
                label,
                male: record.resolve(male),
                female: record.resolve(female),
            })
            .collect(),
        energy_mix: energy_mix(record),
        signal_score: signal_score(&record.digital.signal_strength),
        hazards: Hazard::ordered()
            .into_iter()
            .map(|hazard| {
                let presence = hazard.presence(&record.disaster);
                HazardExposure {
                    hazard,
                    label: hazard.label(),
                    presence,
                    presence_label: presence.label(),
                }
            })
            .collect(),
        diseases: disease_burden(record),
        classifications: Lens::ordered()
            .into_iter()
            .map(|lens| classify(record, lens))
            .collect(),
        resilience: score_with(record, readiness),
    }
}

/// Gauge value for the reported signal strength. "Sangat kuat" is checked before "kuat".
pub fn signal_score(signal_strength: &str) -> u8 {
    let strength = signal_strength.to_lowercase();
    if strength.contains("sangat kuat") {
        100
    } else if strength.contains("kuat") {
        75
    } else if strength.contains("lemah") || strength.contains("cukup") {
        25
    } else {
        0
    }
}

/// Household counts per electricity source, omitting sources with no households.
pub fn energy_mix(record: &VillageRecord) -> Vec<FacilityCount> {
    let grid = &record.infrastructure;
    [
        ("State grid", grid.state_grid),
        ("Non-state grid", grid.non_state_grid),
        ("No electricity", grid.non_electricity),
    ]
    .into_iter()
    .filter(|&(_, count)| count > 0.0)
    .map(|(label, count)| FacilityCount { label, count })
    .collect()
}

fn facets(record: &VillageRecord, table: &[Facet]) -> Vec<FacilityCount> {
    table
        .iter()
        .map(|facet| FacilityCount {
            label: facet.label,
            count: facet.paths.iter().map(|path| record.resolve(path)).sum(),
        })
        .collect()
}

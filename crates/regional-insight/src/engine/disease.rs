use super::domain::{DiseaseBlock, VillageRecord};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    DengueFever,
    Malaria,
    AcuteDiarrhea,
    Measles,
    Sars,
    HepatitisE,
    Diphtheria,
    Covid19,
}

impl Disease {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::DengueFever,
            Self::Malaria,
            Self::AcuteDiarrhea,
            Self::Measles,
            Self::Sars,
            Self::HepatitisE,
            Self::Diphtheria,
            Self::Covid19,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DengueFever => "Dengue Fever",
            Self::Malaria => "Malaria",
            Self::AcuteDiarrhea => "Acute Diarrhea",
            Self::Measles => "Measles",
            Self::Sars => "SARS",
            Self::HepatitisE => "Hepatitis E",
            Self::Diphtheria => "Diphtheria",
            Self::Covid19 => "COVID-19",
        }
    }

    /// `(cases, deaths)` recorded for this disease.
    pub fn counts(self, block: &DiseaseBlock) -> (f64, f64) {
        match self {
            Self::DengueFever => (block.dbd_cases, block.dbd_deaths),
            Self::Malaria => (block.malaria_cases, block.malaria_deaths),
            Self::AcuteDiarrhea => (block.muntaber_cases, block.muntaber_deaths),
            Self::Measles => (block.campak_cases, block.campak_deaths),
            Self::Sars => (block.sars_cases, block.sars_deaths),
            Self::HepatitisE => (block.hepatitis_e_cases, block.hepatitis_e_deaths),
            Self::Diphtheria => (block.difteri_cases, block.difteri_deaths),
            Self::Covid19 => (block.covid_cases, block.covid_deaths),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CfrBand {
    High,
    Elevated,
    Clear,
}

impl CfrBand {
    pub fn for_ratio(cfr: f64) -> Self {
        if cfr > 2.0 {
            Self::High
        } else if cfr > 0.0 {
            Self::Elevated
        } else {
            Self::Clear
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Elevated => "Elevated",
            Self::Clear => "Clear",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseBurden {
    pub disease: Disease,
    pub name: &'static str,
    pub cases: f64,
    pub deaths: f64,
    pub cfr: f64,
    pub band: CfrBand,
}

impl DiseaseBurden {
    fn new(disease: Disease, cases: f64, deaths: f64) -> Self {
        let cfr = case_fatality_ratio(cases, deaths);
        Self {
            disease,
            name: disease.label(),
            cases,
            deaths,
            cfr,
            band: CfrBand::for_ratio(cfr),
        }
    }
}

/// Deaths per hundred cases, rounded to one decimal. Zero when there are no cases.
pub fn case_fatality_ratio(cases: f64, deaths: f64) -> f64 {
    if cases > 0.0 {
        (deaths / cases * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Per-disease burden for one village, most cases first.
pub fn disease_burden(record: &VillageRecord) -> Vec<DiseaseBurden> {
    let entries = Disease::ordered()
        .into_iter()
        .map(|disease| {
            let (cases, deaths) = disease.counts(&record.disease);
            DiseaseBurden::new(disease, cases, deaths)
        })
        .collect();

    rank_by_cases(entries)
}

/// Cases and deaths pooled across the snapshot before computing the ratio.
pub fn regional_disease_burden(records: &[VillageRecord]) -> Vec<DiseaseBurden> {
    let entries = Disease::ordered()
        .into_iter()
        .map(|disease| {
            let (cases, deaths) = records
                .iter()
                .map(|record| disease.counts(&record.disease))
                .fold((0.0, 0.0), |(cases, deaths), (c, d)| (cases + c, deaths + d));
            DiseaseBurden::new(disease, cases, deaths)
        })
        .collect();

    rank_by_cases(entries)
}

// `sort_by` is stable, so equal case counts keep enumeration order. Counts are always finite.
fn rank_by_cases(mut entries: Vec<DiseaseBurden>) -> Vec<DiseaseBurden> {
    entries.sort_by(|a, b| b.cases.partial_cmp(&a.cases).unwrap_or(Ordering::Equal));
    entries
}

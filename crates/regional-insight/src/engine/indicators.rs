use super::domain::VillageRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    VulnerablePopulation,
    DigitalConnectivity,
    EconomicPower,
    HealthAlertLoad,
}

impl IndicatorKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::VulnerablePopulation,
            Self::DigitalConnectivity,
            Self::EconomicPower,
            Self::HealthAlertLoad,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VulnerablePopulation => "Vulnerable Population",
            Self::DigitalConnectivity => "Digital Connectivity Index",
            Self::EconomicPower => "Economic Power",
            Self::HealthAlertLoad => "Health Alert Load",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorDetail {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub label: &'static str,
    pub value: f64,
    pub details: Vec<IndicatorDetail>,
}

/// Headline indicators in [`IndicatorKind::ordered`] order. Detail lists keep their fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedIndicatorSet {
    indicators: Vec<Indicator>,
}

impl DerivedIndicatorSet {
    pub fn get(&self, kind: IndicatorKind) -> Option<&Indicator> {
        self.indicators.iter().find(|indicator| indicator.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

pub fn aggregate(records: &[VillageRecord]) -> DerivedIndicatorSet {
    let indicators = IndicatorKind::ordered()
        .into_iter()
        .map(|kind| {
            let (value, details) = match kind {
                IndicatorKind::VulnerablePopulation => vulnerable_population(records),
                IndicatorKind::DigitalConnectivity => digital_connectivity(records),
                IndicatorKind::EconomicPower => economic_power(records),
                IndicatorKind::HealthAlertLoad => health_alert_load(records),
            };
            Indicator {
                kind,
                label: kind.label(),
                value,
                details,
            }
        })
        .collect();

    DerivedIndicatorSet { indicators }
}

/// Sum of the value at `path` across the snapshot, via the field resolver.
pub fn sum_field(records: &[VillageRecord], path: &str) -> f64 {
    total(records, |record| record.resolve(path))
}

fn vulnerable_population(records: &[VillageRecord]) -> (f64, Vec<IndicatorDetail>) {
    let sum = total(records, |record| record.disease.disability_population);
    let max = records
        .iter()
        .map(|record| record.disease.disability_population)
        .fold(0.0_f64, f64::max);

    (
        sum,
        vec![
            detail("Avg per Village", ratio(sum, records.len()).round()),
            detail("Max (Single Village)", max),
        ],
    )
}

fn digital_connectivity(records: &[VillageRecord]) -> (f64, Vec<IndicatorDetail>) {
    let connected = count(records, |record| {
        record.digital.village_information_system.is_present()
    });
    let strong_signal = count(records, |record| record.digital.has_strong_signal());
    let bts = total(records, |record| record.digital.bts_count);

    (
        (ratio(connected as f64, records.len()) * 100.0).round(),
        vec![
            detail("Strong Signal", strong_signal as f64),
            detail("Total BTS", bts),
        ],
    )
}

fn economic_power(records: &[VillageRecord]) -> (f64, Vec<IndicatorDetail>) {
    let markets = total(records, |record| record.economy.markets);
    let bumdes = total(records, |record| record.economy.bumdes);
    let cooperatives = total(records, |record| record.economy.cooperatives);

    (
        markets + bumdes,
        vec![
            detail("Markets", markets),
            detail("BUMDes", bumdes),
            detail("Cooperatives", cooperatives),
        ],
    )
}

fn health_alert_load(records: &[VillageRecord]) -> (f64, Vec<IndicatorDetail>) {
    (
        total(records, |record| record.disease.infectious_cases),
        vec![
            detail("Dengue Fever", total(records, |r| r.disease.dbd_cases)),
            detail("Acute Diarrhea", total(records, |r| r.disease.muntaber_cases)),
            detail("Malaria", total(records, |r| r.disease.malaria_cases)),
        ],
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub villages: usize,
}

pub const OTHER_INCOME_LABEL: &str = "Other";

/// Villages grouped by the first listed primary income source, in first-seen order.
pub fn income_distribution(records: &[VillageRecord]) -> Vec<CategoryCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut distribution: Vec<CategoryCount> = Vec::new();

    for record in records {
        let label = record
            .economy
            .primary_income
            .split(',')
            .next()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .unwrap_or(OTHER_INCOME_LABEL);

        match positions.get(label) {
            Some(&idx) => distribution[idx].villages += 1,
            None => {
                positions.insert(label.to_string(), distribution.len());
                distribution.push(CategoryCount {
                    label: label.to_string(),
                    villages: 1,
                });
            }
        }
    }

    distribution
}

/// Villages served by each kind of electricity supply. A village may appear under several.
pub fn electricity_coverage(records: &[VillageRecord]) -> Vec<CategoryCount> {
    let categories: [(&str, fn(&VillageRecord) -> f64); 3] = [
        ("State grid", |record| record.infrastructure.state_grid),
        ("Non-state grid", |record| record.infrastructure.non_state_grid),
        ("No electricity", |record| record.infrastructure.non_electricity),
    ];

    categories
        .into_iter()
        .map(|(label, field)| CategoryCount {
            label: label.to_string(),
            villages: count(records, |record| field(record) > 0.0),
        })
        .collect()
}

fn detail(label: &'static str, value: f64) -> IndicatorDetail {
    IndicatorDetail { label, value }
}

fn total<F>(records: &[VillageRecord], field: F) -> f64
where
    F: Fn(&VillageRecord) -> f64,
{
    records.iter().map(field).sum()
}

fn count<F>(records: &[VillageRecord], predicate: F) -> usize
where
    F: Fn(&VillageRecord) -> bool,
{
    records.iter().filter(|&record| predicate(record)).count()
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

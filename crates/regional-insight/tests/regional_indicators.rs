use regional_insight::engine::{
    aggregate, classify, classify_all, overview, regional_disease_burden, score, score_all,
    tally, ColorTier, IndicatorKind, Lens, Quadrant, ReadinessModel,
};
use regional_insight::snapshot::{FileSnapshotSource, Snapshot, SnapshotSource};
use std::path::PathBuf;

fn sample_snapshot() -> Snapshot {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/villages.json");
    FileSnapshotSource::new(path)
        .list_villages()
        .expect("bundled snapshot loads")
}

#[test]
fn headline_indicators_sum_the_snapshot() {
    let snapshot = sample_snapshot();
    let indicators = aggregate(snapshot.villages());

    let vulnerable = indicators
        .get(IndicatorKind::VulnerablePopulation)
        .expect("vulnerable population present");
    assert_eq!(vulnerable.value, 23.0);
    assert_eq!(vulnerable.details[0].value, 6.0, "23 / 4 rounds to 6");
    assert_eq!(vulnerable.details[1].value, 12.0);

    let connectivity = indicators
        .get(IndicatorKind::DigitalConnectivity)
        .expect("connectivity present");
    assert_eq!(connectivity.value, 50.0);

    let economy = indicators
        .get(IndicatorKind::EconomicPower)
        .expect("economic power present");
    assert_eq!(economy.value, 6.0);

    let health = indicators
        .get(IndicatorKind::HealthAlertLoad)
        .expect("health alert load present");
    assert_eq!(health.value, 17.0);
}

#[test]
fn empty_snapshot_degrades_to_zeros() {
    let snapshot = Snapshot::empty("empty");
    let indicators = aggregate(snapshot.villages());

    assert_eq!(indicators.len(), 4);
    for indicator in indicators.iter() {
        assert_eq!(indicator.value, 0.0, "{} should be zero", indicator.label);
        assert!(indicator.details.iter().all(|detail| detail.value == 0.0));
    }

    let summary = overview(snapshot.villages(), 5);
    assert_eq!(summary.village_count, 0);
    assert!(summary.leaderboards.iter().all(|board| board.entries.is_empty()));
    assert!(summary.income_distribution.is_empty());
}

#[test]
fn recomputation_is_deterministic() {
    let snapshot = sample_snapshot();
    assert_eq!(aggregate(snapshot.villages()), aggregate(snapshot.villages()));

    let seeded = ReadinessModel::Seeded { seed: 2024 };
    assert_eq!(
        score_all(snapshot.villages(), seeded),
        score_all(snapshot.villages(), seeded)
    );
    assert_eq!(
        score_all(snapshot.villages(), ReadinessModel::Midpoint),
        snapshot.villages().iter().map(score).collect::<Vec<_>>()
    );
}

#[test]
fn risk_lens_flags_disasters_and_outbreaks() {
    let snapshot = sample_snapshot();
    let tiers: Vec<_> = classify_all(snapshot.villages(), Lens::Risk)
        .into_iter()
        .map(|result| result.tier)
        .collect();

    // Pulot has no disaster answer but six infectious cases.
    assert_eq!(
        tiers,
        [
            ColorTier::Alert,
            ColorTier::Positive,
            ColorTier::Alert,
            ColorTier::Alert
        ]
    );

    let economy = tally(&classify_all(snapshot.villages(), Lens::Economy));
    let counts: Vec<_> = economy
        .iter()
        .map(|entry| (entry.tier, entry.villages))
        .collect();
    assert_eq!(counts, [(ColorTier::Neutral, 1), (ColorTier::Positive, 3)]);

    let pulot = snapshot.find("1101022004").expect("Pulot present");
    assert!(!classify(pulot, Lens::Digital).emphasis);
}

#[test]
fn resilience_quadrants_follow_frequency_and_warning_system() {
    let snapshot = sample_snapshot();
    let quadrants: Vec<_> = score_all(snapshot.villages(), ReadinessModel::Midpoint)
        .into_iter()
        .map(|point| point.quadrant)
        .collect();

    assert_eq!(
        quadrants,
        [
            Quadrant::Resilient,
            Quadrant::Safe,
            Quadrant::Danger,
            Quadrant::Resilient
        ]
    );
}

#[test]
fn overview_ranks_and_distributes() {
    let snapshot = sample_snapshot();
    let summary = overview(snapshot.villages(), 2);

    let infectious = &summary.leaderboards[0];
    let ids: Vec<_> = infectious
        .entries
        .iter()
        .map(|entry| entry.village_id.as_str())
        .collect();
    assert_eq!(ids, ["1101012001", "1101022004"]);

    let incomes: Vec<_> = summary
        .income_distribution
        .iter()
        .map(|category| (category.label.as_str(), category.villages))
        .collect();
    assert_eq!(incomes, [("Perikanan", 1), ("Pertanian", 2), ("Other", 1)]);

    let diseases = regional_disease_burden(snapshot.villages());
    assert_eq!(diseases[0].cases, 40.0);
    assert_eq!(diseases[0].cfr, 2.5);
}

use clap::Args;
use regional_insight::config::DEFAULT_LEADERBOARD_SIZE;
use regional_insight::engine::{
    classify_all, overview, score_all, tally, Lens, Quadrant, ReadinessModel, RegionalOverview,
    ResiliencePoint, TierTally,
};
use regional_insight::error::AppError;
use regional_insight::snapshot::{FileSnapshotSource, SnapshotSource};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Snapshot export to summarise (JSON, or CSV with dotted headers)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Lens used for the tier breakdown
    #[arg(long, default_value_t = Lens::Risk)]
    pub(crate) lens: Lens,
    /// Number of villages listed per leaderboard
    #[arg(long, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
    pub(crate) top: usize,
    /// Seed for randomised readiness (midpoint readiness when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let snapshot = FileSnapshotSource::new(&args.snapshot).list_villages()?;
    let readiness = args
        .seed
        .map_or(ReadinessModel::Midpoint, |seed| ReadinessModel::Seeded { seed });

    let villages = snapshot.villages();
    let summary = overview(villages, args.top);
    let tiers = tally(&classify_all(villages, args.lens));
    let points = score_all(villages, readiness);

    println!("Regional insight report");
    println!(
        "Snapshot: {} ({} villages, version {})",
        args.snapshot.display(),
        snapshot.len(),
        snapshot.version()
    );
    render_overview(&summary);
    render_tiers(args.lens, &tiers);
    render_resilience(&points);
    Ok(())
}

fn render_overview(summary: &RegionalOverview) {
    println!("\nIndicators");
    for indicator in summary.indicators.iter() {
        let details = indicator
            .details
            .iter()
            .map(|detail| format!("{} {}", detail.label, detail.value))
            .collect::<Vec<_>>()
            .join(", ");
        println!("- {}: {} ({})", indicator.label, indicator.value, details);
    }

    for board in &summary.leaderboards {
        if board.entries.is_empty() {
            println!("\n{}: none", board.label);
            continue;
        }
        println!("\n{}", board.label);
        for entry in &board.entries {
            println!(
                "{}. {} ({}), {}, early warning {}",
                entry.rank, entry.name, entry.district, entry.value, entry.warning_system_label
            );
        }
    }

    let burdened: Vec<_> = summary
        .diseases
        .iter()
        .filter(|burden| burden.cases > 0.0)
        .collect();
    if burdened.is_empty() {
        println!("\nDisease burden: none reported");
    } else {
        println!("\nDisease burden");
        for burden in burdened {
            println!(
                "- {}: {} cases, {} deaths, CFR {:.1}% ({})",
                burden.name,
                burden.cases,
                burden.deaths,
                burden.cfr,
                burden.band.label()
            );
        }
    }

    println!("\nPrimary income");
    for category in &summary.income_distribution {
        println!("- {}: {} villages", category.label, category.villages);
    }

    println!("\nElectricity coverage");
    for category in &summary.electricity_coverage {
        println!("- {}: {} villages", category.label, category.villages);
    }
}

fn render_tiers(lens: Lens, tiers: &[TierTally]) {
    println!("\nLens '{}'", lens);
    if tiers.is_empty() {
        println!("- no villages classified");
    }
    for tier in tiers {
        println!("- {}: {} villages", tier.tier_label, tier.villages);
    }
}

fn render_resilience(points: &[ResiliencePoint]) {
    println!("\nResilience quadrants");
    for quadrant in Quadrant::ordered() {
        let villages = points
            .iter()
            .filter(|point| point.quadrant == quadrant)
            .count();
        println!("- {}: {} villages", quadrant.label(), villages);
    }
}

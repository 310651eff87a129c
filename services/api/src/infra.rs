use metrics_exporter_prometheus::PrometheusHandle;
use regional_insight::config::{DataConfig, EngineConfig};
use regional_insight::snapshot::{
    BoundaryCache, FileSnapshotSource, Snapshot, SnapshotError, SnapshotSource,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pub(crate) source: Arc<dyn SnapshotSource>,
    pub(crate) boundaries: Arc<BoundaryCache>,
    pub(crate) engine: EngineConfig,
}

impl AppState {
    pub(crate) fn new(
        source: Arc<dyn SnapshotSource>,
        snapshot: Snapshot,
        engine: EngineConfig,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            source,
            boundaries: Arc::new(BoundaryCache::new()),
            engine,
        }
    }

    /// The snapshot currently being served. Handlers hold on to it for the whole request.
    pub(crate) fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pulls a fresh snapshot from the source and swaps it in. A failed load keeps the old one.
    pub(crate) fn reload(&self) -> Result<Arc<Snapshot>, SnapshotError> {
        let fresh = Arc::new(self.source.list_villages()?);
        let previous = std::mem::replace(
            &mut *self.snapshot.write().unwrap_or_else(PoisonError::into_inner),
            fresh.clone(),
        );
        info!(
            previous = previous.version(),
            current = fresh.version(),
            villages = fresh.len(),
            "snapshot reloaded"
        );
        Ok(fresh)
    }
}

pub(crate) fn file_source(data: &DataConfig) -> FileSnapshotSource {
    let source = FileSnapshotSource::new(&data.snapshot_path);
    match &data.boundaries_path {
        Some(path) => source.with_boundaries(path),
        None => source,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use regional_insight::snapshot::InMemorySnapshotSource;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    pub(crate) fn sample_snapshot() -> Snapshot {
        Snapshot::from_json_value(
            "test",
            json!([
                {
                    "id": "1101012001",
                    "name": "Lampuuk",
                    "district": "Lhoknga",
                    "latitude": 5.49,
                    "longitude": 95.24,
                    "disease": { "infectious_cases": 9, "dbd_cases": 40, "dbd_deaths": 1 },
                    "digital": { "village_information_system": "Ada", "signal_strength": "Kuat", "bts_count": 2 },
                    "economy": { "markets": 1, "bumdes": 1, "primary_income": "Perikanan, Pertanian" },
                    "disaster": { "disaster_exist": "Ada", "flood": 3, "warning_system": "Ada" },
                    "infrastructure": { "State_electricity_company": 410 },
                    "health": { "jumlah_dokter": 1, "jumlah_bidan": 2, "total_fasilitas_kesehatan": 2 },
                    "education": { "sd_negeri": 2, "sd_swasta": 1 }
                },
                {
                    "id": "1101012002",
                    "name": "Mon Ikeun",
                    "district": "Lhoknga",
                    "disease": { "infectious_cases": 2 },
                    "economy": { "markets": 3, "bumdes": 2, "primary_income": "Pertanian" },
                    "disaster": { "disaster_exist": "Tidak" }
                }
            ]),
        )
        .expect("sample snapshot is valid")
    }

    pub(crate) fn sample_state() -> AppState {
        let snapshot = sample_snapshot();
        let source = InMemorySnapshotSource::new(snapshot.clone()).with_boundaries(json!({
            "type": "FeatureCollection",
            "features": []
        }));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(Arc::new(source), snapshot, EngineConfig::default(), handle);
        state.readiness.store(true, Ordering::Release);
        state
    }
}

use crate::infra::AppState;
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use regional_insight::engine::{
    aggregate, classify, classify_all, disease_burden, leaderboard, overview, profile,
    score_all, search, tally, ClassificationResult, ColorTier, DerivedIndicatorSet,
    DiseaseBurden, Lens, LeaderboardMetric, LeaderboardView, Quadrant, ReadinessModel,
    RegionalOverview, ResiliencePoint, TierTally, VillageProfile, VillageRecord,
};
use regional_insight::error::AppError;
use regional_insight::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LensQuery {
    #[serde(default)]
    pub(crate) lens: Option<String>,
}

impl LensQuery {
    fn lens(&self) -> Result<Lens, AppError> {
        match self.lens.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Ok(raw.parse()?),
            _ => Ok(Lens::default()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkerView {
    pub(crate) village_id: String,
    pub(crate) name: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) tier: ColorTier,
    pub(crate) tier_label: &'static str,
    pub(crate) emphasis: bool,
    pub(crate) weight: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkersResponse {
    pub(crate) lens: Lens,
    pub(crate) tiers: Vec<TierTally>,
    pub(crate) markers: Vec<MarkerView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuadrantCount {
    pub(crate) quadrant: Quadrant,
    pub(crate) quadrant_label: &'static str,
    pub(crate) villages: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResilienceResponse {
    pub(crate) model: ReadinessModel,
    pub(crate) quadrants: Vec<QuadrantCount>,
    pub(crate) points: Vec<ResiliencePoint>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchHit {
    pub(crate) village_id: String,
    pub(crate) name: String,
    pub(crate) district: String,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/indicators", get(indicators_endpoint))
        .route("/api/v1/overview", get(overview_endpoint))
        .route("/api/v1/markers", get(markers_endpoint))
        .route("/api/v1/resilience", get(resilience_endpoint))
        .route("/api/v1/leaderboards/:metric", get(leaderboard_endpoint))
        .route("/api/v1/search", get(search_endpoint))
        .route("/api/v1/villages/:id", get(village_profile_endpoint))
        .route(
            "/api/v1/villages/:id/classification",
            get(village_classification_endpoint),
        )
        .route("/api/v1/villages/:id/diseases", get(village_diseases_endpoint))
        .route("/api/v1/boundaries", get(boundaries_endpoint))
        .route("/api/v1/snapshot/reload", post(reload_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        let snapshot = state.snapshot();
        json!({
            "status": "ready",
            "snapshot_version": snapshot.version(),
            "captured_at": snapshot.captured_at().to_rfc3339(),
            "villages": snapshot.len(),
            "boundaries_version": state.boundaries.cached_version(),
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn indicators_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<DerivedIndicatorSet> {
    Json(aggregate(state.snapshot().villages()))
}

pub(crate) async fn overview_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<RegionalOverview> {
    let snapshot = state.snapshot();
    Json(overview(snapshot.villages(), state.engine.leaderboard_size))
}

pub(crate) async fn markers_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<LensQuery>,
) -> Result<Json<MarkersResponse>, AppError> {
    let lens = query.lens()?;
    let snapshot = state.snapshot();
    let villages = snapshot.villages();
    let results = classify_all(villages, lens);
    let tiers = tally(&results);

    let markers = villages
        .iter()
        .zip(results)
        .map(|(village, result)| MarkerView {
            village_id: result.village_id,
            name: village.name.clone(),
            latitude: village.latitude,
            longitude: village.longitude,
            tier: result.tier,
            tier_label: result.tier.label(),
            emphasis: result.emphasis,
            weight: result.weight,
        })
        .collect();

    Ok(Json(MarkersResponse {
        lens,
        tiers,
        markers,
    }))
}

pub(crate) async fn resilience_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ResilienceResponse> {
    let points = score_all(state.snapshot().villages(), state.engine.readiness);
    let quadrants = Quadrant::ordered()
        .into_iter()
        .map(|quadrant| QuadrantCount {
            quadrant,
            quadrant_label: quadrant.label(),
            villages: points
                .iter()
                .filter(|point| point.quadrant == quadrant)
                .count(),
        })
        .collect();

    Json(ResilienceResponse {
        model: state.engine.readiness,
        quadrants,
        points,
    })
}

pub(crate) async fn leaderboard_endpoint(
    Extension(state): Extension<AppState>,
    Path(metric): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<LeaderboardView>, AppError> {
    let metric: LeaderboardMetric = metric.parse()?;
    let limit = query.limit.unwrap_or(state.engine.leaderboard_size);

    Ok(Json(LeaderboardView {
        metric,
        label: metric.label(),
        entries: leaderboard(state.snapshot().villages(), metric, limit),
    }))
}

pub(crate) async fn search_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SearchHit>> {
    let snapshot = state.snapshot();
    let hits = search(snapshot.villages(), &query.q)
        .into_iter()
        .map(|village| SearchHit {
            village_id: village.id.clone(),
            name: village.name.clone(),
            district: village.district.clone(),
        })
        .collect();

    Json(hits)
}

fn find_village<'a>(snapshot: &'a Snapshot, id: &str) -> Result<&'a VillageRecord, AppError> {
    snapshot
        .find(id)
        .ok_or_else(|| AppError::VillageNotFound(id.to_string()))
}

pub(crate) async fn village_profile_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VillageProfile>, AppError> {
    let snapshot = state.snapshot();
    let village = find_village(&snapshot, &id)?;
    Ok(Json(profile(village, state.engine.readiness)))
}

pub(crate) async fn village_classification_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LensQuery>,
) -> Result<Json<ClassificationResult>, AppError> {
    let lens = query.lens()?;
    let snapshot = state.snapshot();
    let village = find_village(&snapshot, &id)?;
    Ok(Json(classify(village, lens)))
}

pub(crate) async fn village_diseases_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DiseaseBurden>>, AppError> {
    let snapshot = state.snapshot();
    let village = find_village(&snapshot, &id)?;
    Ok(Json(disease_burden(village)))
}

pub(crate) async fn boundaries_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Response, AppError> {
    let snapshot = state.snapshot();
    let version = snapshot.version();
    let source = state.source.clone();
    let boundaries = state.boundaries.get_or_load(version, || {
        debug!(version, "loading district boundaries");
        source.list_boundaries()
    })?;

    let response = match boundaries {
        Some(polygons) => Json(polygons.as_ref().clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no district boundaries configured" })),
        )
            .into_response(),
    };
    Ok(response)
}

pub(crate) async fn reload_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.reload()?;
    Ok(Json(json!({
        "snapshot_version": snapshot.version(),
        "captured_at": snapshot.captured_at().to_rfc3339(),
        "villages": snapshot.len(),
    })))
}

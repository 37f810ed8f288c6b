use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use pyme360::error::AppError;
use pyme360::scoring::{
    BusinessProfile, CachePolicy, CreditScoreResult, ScoreEngine, ScoreUpdate, TrendGranularity,
    TrustScoreResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) profile: serde_json::Value,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) force_recompute: bool,
    #[serde(default)]
    pub(crate) granularity: Option<TrendGranularity>,
}

impl ScoreRequest {
    fn into_parts(self, base: &ScoreEngine) -> Result<(BusinessProfile, NaiveDate, ScoreEngine), AppError> {
        let profile = BusinessProfile::from_value(self.profile)?;
        let as_of = self.as_of.unwrap_or_else(|| Local::now().date_naive());

        let mut engine = base.with_cache_policy(CachePolicy::from_force_recompute(self.force_recompute));
        if let Some(granularity) = self.granularity {
            engine = engine.with_trend(granularity);
        }
        Ok((profile, as_of, engine))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateResponse {
    pub(crate) message: &'static str,
    #[serde(flatten)]
    pub(crate) scores: ScoreUpdate,
}

pub(crate) fn score_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/scores/credit",
            axum::routing::post(credit_score_endpoint),
        )
        .route(
            "/api/v1/scores/trust",
            axum::routing::post(trust_score_endpoint),
        )
        .route(
            "/api/v1/scores/update",
            axum::routing::post(update_scores_endpoint),
        )
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
        json!({ "status": "ready" })
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

pub(crate) async fn credit_score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<CreditScoreResult>, AppError> {
    let (profile, as_of, engine) = payload.into_parts(&state.engine)?;
    let result = engine.credit_score(&profile, as_of, &mut state.rng())?;

    info!(score = result.score, basis = ?result.basis, %as_of, "credit score served");
    Ok(Json(result))
}

pub(crate) async fn trust_score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<TrustScoreResult>, AppError> {
    let (profile, as_of, engine) = payload.into_parts(&state.engine)?;
    let result = engine.trust_score(&profile, as_of, &mut state.rng())?;

    info!(score = result.global_score, level = ?result.level, %as_of, "trust score served");
    Ok(Json(result))
}

pub(crate) async fn update_scores_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let (profile, as_of, engine) = payload.into_parts(&state.engine)?;
    let scores = engine.update_scores(&profile, as_of, &mut state.rng());

    Ok(Json(UpdateResponse {
        message: "Scores updated",
        scores,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pyme360::scoring::ScoringOptions;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            engine: Arc::new(ScoreEngine::new(ScoringOptions::default())),
            seed: Some(42),
        }
    }

    fn router(ready: bool) -> axum::Router {
        score_routes().layer(Extension(state(ready)))
    }

    fn profile() -> Value {
        json!({
            "informacion_general": { "fecha_fundacion": "2012-03-01", "tamano_empresa": "Pequeña" },
            "historial_crediticio": {
                "cuentas_credito": [{
                    "tipo": "Préstamo",
                    "fecha_apertura": "2016-10-19",
                    "saldo_actual": 500,
                    "limite_credito": 10000,
                    "historial_pagos": [
                        { "fecha": "2026-08-01", "estado": "A tiempo" },
                        { "fecha": "2026-09-01", "estado": "A tiempo" }
                    ]
                }]
            }
        })
    }

    async fn post(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = readiness_endpoint(Extension(state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn credit_route_scores_profile() {
        let (status, body) = post(
            router(true),
            "/api/v1/scores/credit",
            json!({ "profile": profile(), "as_of": "2026-10-19" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], json!(828));
        assert_eq!(body["tier"]["name"], json!("Excellent"));
        assert_eq!(body["as_of"], json!("2026-10-19"));
    }

    #[tokio::test]
    async fn credit_route_rejects_missing_history() {
        let (status, body) = post(
            router(true),
            "/api/v1/scores/credit",
            json!({ "profile": { "informacion_general": {} } }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("historial_crediticio")));
    }

    #[tokio::test]
    async fn trust_route_honors_granularity() {
        let (status, body) = post(
            router(true),
            "/api/v1/scores/trust",
            json!({
                "profile": profile(),
                "as_of": "2026-10-19",
                "force_recompute": true,
                "granularity": "quarterly"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["historical_trend"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["components"].as_array().map(Vec::len), Some(6));
    }

    #[tokio::test]
    async fn trust_route_rejects_empty_profile() {
        let (status, body) = post(router(true), "/api/v1/scores/trust", json!({ "profile": {} })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("no profile data available"));
    }

    #[tokio::test]
    async fn non_object_profile_is_a_bad_request() {
        let (status, body) = post(
            router(true),
            "/api/v1/scores/trust",
            json!({ "profile": "acme" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn update_route_returns_both_scores() {
        let (status, body) = post(
            router(true),
            "/api/v1/scores/update",
            json!({ "profile": profile(), "as_of": "2026-10-19" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Scores updated"));
        assert_eq!(body["credit_score"]["score"], json!(828));
        assert!(body["trust_score"]["global_score"].is_number());
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_by_extractor() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scores/credit")
            .header("content-type", "application/json")
            .body(Body::from("{\"profile\":"))
            .expect("request");

        let response = router(true).oneshot(request).await.expect("router dispatch");
        assert!(response.status().is_client_error());
    }
}

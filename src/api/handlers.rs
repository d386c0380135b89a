//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse};
use crate::gap::engine::decompose;
use crate::gap::types::{EyaEstimate, OaResult};
use crate::gap::validate::validate_inputs;
use crate::reporting::GapReport;
use crate::wire::{GapAnalysisRequest, GapAnalysisResponse};

type ApiResult = Result<Json<GapAnalysisResponse>, (StatusCode, Json<ErrorResponse>)>;

/// Validates the inputs and runs the unadjusted decomposition.
///
/// Either a complete response or an error is produced, never a partial one.
fn analyse(eya: &EyaEstimate, oa: &OaResult) -> ApiResult {
    let errors = validate_inputs(eya, oa);
    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "rejected gap request");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::from_input_errors(&errors)),
        ));
    }

    let report = GapReport::new(decompose(eya, oa, None));
    tracing::debug!(
        gap = report.decomposition.gap,
        health = report.health_label(),
        "decomposed gap"
    );
    Ok(Json(GapAnalysisResponse::new(
        eya,
        oa,
        &report.decomposition,
        &report.bars,
        report.health,
    )))
}

/// Decomposes the EYA/OA figures in the request body.
///
/// `POST /eya-gap` → 200 + `GapAnalysisResponse` JSON
/// invalid loss fractions or energies → 422 + `ErrorResponse`
pub async fn post_gap(Json(req): Json<GapAnalysisRequest>) -> ApiResult {
    analyse(&req.eya_estimates, &req.oa_results)
}

/// Decomposes the case loaded at startup.
///
/// `GET /eya-gap` → 200 + `GapAnalysisResponse` JSON
pub async fn get_case_gap(State(state): State<Arc<AppState>>) -> ApiResult {
    analyse(&state.case.eya(), &state.case.oa())
}

/// `GET /health` → 200 + `{"status": "ok"}`
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::CaseConfig;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            case: CaseConfig::reference(),
        })
    }

    fn post_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/eya-gap")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn reference_body() -> serde_json::Value {
        serde_json::json!({
            "eya_estimates": {
                "aep": 12.4,
                "gross_energy": 15.2,
                "availability_losses": 0.032,
                "electrical_losses": 0.015,
                "turbine_losses": 0.04,
                "blade_degradation_losses": 0.01,
                "wake_losses": 0.08
            },
            "oa_results": {
                "aep": 11.1,
                "turbine_ideal_energy": 13.6,
                "availability_losses": 0.041,
                "electrical_losses": 0.018
            }
        })
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn post_returns_decomposition() {
        let app = router(make_test_state());
        let resp = app.oneshot(post_request(reference_body())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["compiled_data"].as_array().map(Vec::len), Some(5));
        assert_eq!(json["waterfall_labels"][0], "EYA AEP");
        assert_eq!(json["health"]["label"], "Significant Underperformance");
        assert!((json["gap_gwh"].as_f64().unwrap() + 1.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn post_rejects_loss_of_one() {
        let app = router(make_test_state());
        let mut body = reference_body();
        body["oa_results"]["availability_losses"] = serde_json::json!(1.0);
        let resp = app.oneshot(post_request(body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
        assert!(
            json["details"][0]
                .as_str()
                .unwrap()
                .contains("oa.availability_losses")
        );
    }

    #[tokio::test]
    async fn get_returns_startup_case() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/eya-gap")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["eya_aep"], 12.4);
        assert_eq!(json["oa_aep"], 11.1);
    }
}

//! Analytics backend client.
//!
//! Issues the single network call that fetches the authoritative initial
//! decomposition, then checks that the local engine reproduces it. Later
//! sensitivity changes never come back here.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::gap::engine::decompose;
use crate::gap::types::{EyaEstimate, GapDecomposition, OaResult};
use crate::wire::{GapAnalysisRequest, GapAnalysisResponse};

/// Path of the gap-analysis endpoint below the backend base URL.
pub const GAP_ENDPOINT: &str = "/eya-gap";

/// Errors raised while obtaining the initial decomposition.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No backend URL configured.
    #[error("no backend url configured")]
    NoBackend,
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with a non-success status.
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    /// Backend response is internally inconsistent.
    #[error("malformed backend response: {0}")]
    Malformed(String),
    /// Backend and local engine disagree on a component.
    #[error("backend {component} = {backend} but local engine gives {local} (tolerance {tolerance})")]
    Mismatch {
        component: &'static str,
        backend: f64,
        local: f64,
        tolerance: f64,
    },
}

/// Client for the analytics backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    tolerance: f64,
}

impl BackendClient {
    /// Builds a client from the `[backend]` configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoBackend`] when no URL is configured, or
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(cfg: &BackendConfig) -> Result<Self, ClientError> {
        let base_url = cfg.url.as_deref().ok_or(ClientError::NoBackend)?;
        let mut builder = Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            tolerance: cfg.tolerance,
        })
    }

    /// Full URL of the gap endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{GAP_ENDPOINT}", self.base_url)
    }

    /// Fetches the backend's decomposition for the given inputs.
    ///
    /// Not retried.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_initial(
        &self,
        eya: &EyaEstimate,
        oa: &OaResult,
    ) -> Result<GapAnalysisResponse, ClientError> {
        let url = self.endpoint();
        tracing::info!(%url, "requesting initial decomposition");
        let body = GapAnalysisRequest {
            eya_estimates: *eya,
            oa_results: *oa,
        };
        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = error_detail(&text);
            tracing::warn!(%status, %detail, "backend rejected gap request");
            return Err(ClientError::Status { status, detail });
        }

        Ok(resp.json::<GapAnalysisResponse>().await?)
    }

    /// Fetches the initial decomposition and confirms the local engine
    /// reproduces it.
    ///
    /// On success the returned decomposition is the local one, so later
    /// sensitivity recomputes start from exactly the same arithmetic.
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] from the request, or [`ClientError::Mismatch`].
    pub async fn initial_decomposition(
        &self,
        eya: &EyaEstimate,
        oa: &OaResult,
    ) -> Result<GapDecomposition, ClientError> {
        let resp = self.fetch_initial(eya, oa).await?;
        verify_against_local(&resp, eya, oa, self.tolerance)
    }
}

/// Extracts the backend's error text from a JSON `detail` or `error` field,
/// falling back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .map(|d| d.as_str().map_or_else(|| d.to_string(), str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Compares a backend response with `decompose(eya, oa, None)`.
///
/// # Errors
///
/// [`ClientError::Malformed`] if the response echoes different inputs, or
/// [`ClientError::Mismatch`] naming the first component further than
/// `tolerance` from the local value.
pub fn verify_against_local(
    resp: &GapAnalysisResponse,
    eya: &EyaEstimate,
    oa: &OaResult,
    tolerance: f64,
) -> Result<GapDecomposition, ClientError> {
    if resp.eya_estimates != *eya || resp.oa_results != *oa {
        return Err(ClientError::Malformed(
            "response echoes different EYA/OA inputs".to_string(),
        ));
    }

    let local = decompose(eya, oa, None);
    let backend = resp.decomposition();
    let pairs = [
        ("eya_aep", backend.eya_aep, local.eya_aep),
        (
            "turbine_ideal_diff",
            backend.turbine_ideal_diff,
            local.turbine_ideal_diff,
        ),
        (
            "availability_diff",
            backend.availability_diff,
            local.availability_diff,
        ),
        (
            "electrical_diff",
            backend.electrical_diff,
            local.electrical_diff,
        ),
        (
            "unexplained_residual",
            backend.unexplained_residual,
            local.unexplained_residual,
        ),
    ];
    for (component, b, l) in pairs {
        if !((b - l).abs() <= tolerance) {
            tracing::warn!(component, backend = b, local = l, "backend/local mismatch");
            return Err(ClientError::Mismatch {
                component,
                backend: b,
                local: l,
                tolerance,
            });
        }
    }

    tracing::debug!("backend decomposition reproduced locally");
    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::waterfall::build_waterfall;

    fn inputs() -> (EyaEstimate, OaResult) {
        (
            EyaEstimate {
                aep: 12.4,
                gross_energy: 15.2,
                availability_losses: 0.032,
                electrical_losses: 0.015,
                turbine_losses: 0.04,
                blade_degradation_losses: 0.01,
                wake_losses: 0.08,
            },
            OaResult {
                aep: 11.1,
                turbine_ideal_energy: 13.6,
                availability_losses: 0.041,
                electrical_losses: 0.018,
            },
        )
    }

    fn backend_response() -> GapAnalysisResponse {
        let (eya, oa) = inputs();
        let d = decompose(&eya, &oa, None);
        GapAnalysisResponse::new(&eya, &oa, &d, &build_waterfall(&d), None)
    }

    #[test]
    fn matching_response_verifies() {
        let (eya, oa) = inputs();
        let local = verify_against_local(&backend_response(), &eya, &oa, 1e-9);
        assert!(local.is_ok());
    }

    #[test]
    fn rounded_response_within_tolerance_verifies() {
        let (eya, oa) = inputs();
        let mut resp = backend_response();
        for v in &mut resp.compiled_data {
            *v = (*v * 1e6).round() / 1e6;
        }
        assert!(verify_against_local(&resp, &eya, &oa, 1e-6).is_ok());
    }

    #[test]
    fn drifted_component_is_named() {
        let (eya, oa) = inputs();
        let mut resp = backend_response();
        resp.compiled_data[2] += 0.01;
        let err = verify_against_local(&resp, &eya, &oa, 1e-6).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Mismatch {
                component: "availability_diff",
                ..
            }
        ));
    }

    #[test]
    fn nan_component_is_a_mismatch() {
        let (eya, oa) = inputs();
        let mut resp = backend_response();
        resp.compiled_data[4] = f64::NAN;
        assert!(verify_against_local(&resp, &eya, &oa, 1e-6).is_err());
    }

    #[test]
    fn different_echo_is_malformed() {
        let (eya, mut oa) = inputs();
        let resp = backend_response();
        oa.aep = 11.2;
        let err = verify_against_local(&resp, &eya, &oa, 1e-6).unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[test]
    fn full_precision_echo_survives_json() {
        let (mut eya, oa) = inputs();
        eya.availability_losses = 0.237_378_896_399_999_98;
        let d = decompose(&eya, &oa, None);
        let sent = GapAnalysisResponse::new(&eya, &oa, &d, &build_waterfall(&d), None);

        let json = serde_json::to_string(&sent).unwrap();
        let received: GapAnalysisResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(received.eya_estimates, eya);
        assert!(verify_against_local(&received, &eya, &oa, 1e-9).is_ok());
    }

    #[test]
    fn error_detail_prefers_json_fields() {
        assert_eq!(error_detail(r#"{"detail":"bad losses"}"#), "bad losses");
        assert_eq!(error_detail(r#"{"error":"nope"}"#), "nope");
        assert_eq!(error_detail(" plain text \n"), "plain text");
    }

    #[test]
    fn missing_url_is_rejected() {
        let err = BackendClient::new(&BackendConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::NoBackend));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let cfg = BackendConfig {
            url: Some("http://localhost:8000/".to_string()),
            ..BackendConfig::default()
        };
        let client = BackendClient::new(&cfg).ok();
        assert_eq!(
            client.map(|c| c.endpoint()).as_deref(),
            Some("http://localhost:8000/eya-gap")
        );
    }
}

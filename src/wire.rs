//! Request and response bodies exchanged with the analytics backend.
//!
//! Field names follow the backend's JSON contract so the local server and a
//! remote backend are interchangeable.

use serde::{Deserialize, Serialize};

use crate::gap::health::HealthStatus;
use crate::gap::types::{EyaEstimate, GapDecomposition, OaResult};
use crate::gap::waterfall::{BAR_LABELS, WaterfallBar};

/// Request body for `POST /eya-gap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysisRequest {
    pub eya_estimates: EyaEstimate,
    pub oa_results: OaResult,
}

/// One waterfall bar in the response, owning its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBarRecord {
    pub label: String,
    pub base: f64,
    pub height: f64,
    pub signed_value: f64,
    pub is_total: bool,
}

impl From<&WaterfallBar> for WaterfallBarRecord {
    fn from(b: &WaterfallBar) -> Self {
        Self {
            label: b.label.to_string(),
            base: b.base,
            height: b.height,
            signed_value: b.signed_value,
            is_total: b.is_total,
        }
    }
}

/// Health classification in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub label: String,
    pub severity_rank: u8,
}

impl From<HealthStatus> for HealthRecord {
    fn from(h: HealthStatus) -> Self {
        Self {
            label: h.label().to_string(),
            severity_rank: h.severity_rank(),
        }
    }
}

/// Response body for `POST /eya-gap`.
///
/// `compiled_data` is `[eya_aep, turbine_ideal_diff, availability_diff,
/// electrical_diff, unexplained_residual]`. The waterfall and health fields
/// are optional on decode since older backends omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysisResponse {
    pub compiled_data: [f64; 5],
    pub waterfall_labels: Vec<String>,
    pub eya_aep: f64,
    pub oa_aep: f64,
    pub gap_gwh: f64,
    /// `null` when EYA AEP is zero.
    pub gap_pct: Option<f64>,
    pub eya_turbine_ideal_energy: f64,
    pub avail_diff_gwh: f64,
    pub elec_diff_gwh: f64,
    pub unexplained_gwh: f64,
    pub eya_estimates: EyaEstimate,
    pub oa_results: OaResult,
    #[serde(default)]
    pub waterfall: Option<Vec<WaterfallBarRecord>>,
    #[serde(default)]
    pub health: Option<HealthRecord>,
}

impl GapAnalysisResponse {
    /// Builds the response for a decomposition of the given inputs.
    pub fn new(
        eya: &EyaEstimate,
        oa: &OaResult,
        decomposition: &GapDecomposition,
        bars: &[WaterfallBar],
        health: Option<HealthStatus>,
    ) -> Self {
        let d = decomposition;
        Self {
            compiled_data: [
                d.eya_aep,
                d.turbine_ideal_diff,
                d.availability_diff,
                d.electrical_diff,
                d.unexplained_residual,
            ],
            waterfall_labels: BAR_LABELS.iter().map(|l| (*l).to_string()).collect(),
            eya_aep: d.eya_aep,
            oa_aep: d.oa_aep,
            gap_gwh: d.gap,
            gap_pct: d.gap_percent,
            eya_turbine_ideal_energy: d.eya_ideal_energy,
            avail_diff_gwh: d.availability_diff,
            elec_diff_gwh: d.electrical_diff,
            unexplained_gwh: d.unexplained_residual,
            eya_estimates: *eya,
            oa_results: *oa,
            waterfall: Some(bars.iter().map(WaterfallBarRecord::from).collect()),
            health: health.map(HealthRecord::from),
        }
    }

    /// The backend's decomposition, rebuilt from `compiled_data`.
    ///
    /// EYA ideal energy is recovered as OA turbine ideal energy minus the
    /// turbine ideal diff, since the summary fields may be rounded.
    pub fn decomposition(&self) -> GapDecomposition {
        let [eya_aep, turbine_ideal_diff, availability_diff, electrical_diff, unexplained_residual] =
            self.compiled_data;
        GapDecomposition {
            eya_aep,
            oa_aep: self.oa_results.aep,
            eya_ideal_energy: self.oa_results.turbine_ideal_energy - turbine_ideal_diff,
            turbine_ideal_diff,
            availability_diff,
            electrical_diff,
            unexplained_residual,
            adjusted_availability_losses: self.oa_results.availability_losses,
            adjusted_electrical_losses: self.oa_results.electrical_losses,
            gap: self.oa_results.aep - eya_aep,
            gap_percent: self.gap_pct,
        }
    }
}

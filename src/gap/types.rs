//! Core gap-analysis types: EYA and OA inputs, sensitivity deltas, and the
//! derived decomposition.

use serde::{Deserialize, Serialize};

/// Energy Yield Assessment estimate for a wind plant.
///
/// Energies are in GWh/yr; losses are fractions in `[0, 1)`.
///
/// # Examples
///
/// ```
/// use eya_gap::gap::types::EyaEstimate;
///
/// let eya = EyaEstimate {
///     aep: 12.4,
///     gross_energy: 15.2,
///     availability_losses: 0.032,
///     electrical_losses: 0.015,
///     turbine_losses: 0.04,
///     blade_degradation_losses: 0.01,
///     wake_losses: 0.08,
/// };
/// assert!(eya.ideal_energy() < eya.gross_energy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyaEstimate {
    /// Predicted annual energy production (GWh/yr).
    pub aep: f64,
    /// Energy before any losses (GWh/yr).
    pub gross_energy: f64,
    /// Availability loss fraction.
    pub availability_losses: f64,
    /// Electrical loss fraction.
    pub electrical_losses: f64,
    /// Turbine performance loss fraction.
    pub turbine_losses: f64,
    /// Blade degradation loss fraction.
    pub blade_degradation_losses: f64,
    /// Wake loss fraction.
    pub wake_losses: f64,
}

impl EyaEstimate {
    /// Turbine ideal energy implied by the EYA: gross energy after turbine,
    /// wake and blade degradation losses, compounded multiplicatively.
    pub fn ideal_energy(&self) -> f64 {
        self.gross_energy
            * (1.0 - self.turbine_losses)
            * (1.0 - self.wake_losses)
            * (1.0 - self.blade_degradation_losses)
    }
}

/// Operational Assessment result derived from measured data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OaResult {
    /// Operational annual energy production (GWh/yr).
    pub aep: f64,
    /// Energy before availability and electrical losses (GWh/yr).
    pub turbine_ideal_energy: f64,
    /// Availability loss fraction.
    pub availability_losses: f64,
    /// Electrical loss fraction.
    pub electrical_losses: f64,
}

/// User-driven deltas added to the OA loss fractions before decomposition.
///
/// The default is the zero adjustment, under which the adjusted OA equals
/// the original OA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAdjustment {
    /// Added to `OaResult::availability_losses`.
    pub availability_delta: f64,
    /// Added to `OaResult::electrical_losses`.
    pub electrical_delta: f64,
}

impl SensitivityAdjustment {
    pub fn new(availability_delta: f64, electrical_delta: f64) -> Self {
        Self {
            availability_delta,
            electrical_delta,
        }
    }

    /// Returns `true` when both deltas are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.availability_delta == 0.0 && self.electrical_delta == 0.0
    }
}

/// Additive decomposition of the gap between EYA and OA AEP.
///
/// Recomputed from scratch on every input change. The four components always
/// bridge `eya_aep` to `oa_aep`:
///
/// `eya_aep + turbine_ideal_diff + availability_diff + electrical_diff + unexplained_residual == oa_aep`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapDecomposition {
    /// EYA annual energy production (GWh/yr).
    pub eya_aep: f64,
    /// OA annual energy production (GWh/yr).
    pub oa_aep: f64,
    /// EYA turbine ideal energy (GWh/yr).
    pub eya_ideal_energy: f64,
    /// OA turbine ideal energy minus EYA turbine ideal energy (GWh/yr).
    pub turbine_ideal_diff: f64,
    /// Availability contribution against the EYA ideal-energy base (GWh/yr).
    pub availability_diff: f64,
    /// Electrical contribution against the EYA ideal-energy base (GWh/yr).
    pub electrical_diff: f64,
    /// Everything the three named drivers do not explain (GWh/yr).
    pub unexplained_residual: f64,
    /// OA availability loss fraction after sensitivity adjustment and clamping.
    pub adjusted_availability_losses: f64,
    /// OA electrical loss fraction after sensitivity adjustment and clamping.
    pub adjusted_electrical_losses: f64,
    /// `oa_aep - eya_aep` (GWh/yr).
    pub gap: f64,
    /// Gap as a percentage of EYA AEP; `None` when EYA AEP is zero.
    pub gap_percent: Option<f64>,
}

impl GapDecomposition {
    /// The four middle components in waterfall order.
    pub fn components(&self) -> [f64; 4] {
        [
            self.turbine_ideal_diff,
            self.availability_diff,
            self.electrical_diff,
            self.unexplained_residual,
        ]
    }

    /// OA turbine ideal energy recovered from the decomposition.
    pub fn oa_ideal_energy(&self) -> f64 {
        self.eya_ideal_energy + self.turbine_ideal_diff
    }

    /// Absolute error of the additive bridge from EYA AEP to OA AEP.
    pub fn bridge_error(&self) -> f64 {
        let bridged = self.eya_aep + self.components().iter().sum::<f64>();
        (bridged - self.oa_aep).abs()
    }
}

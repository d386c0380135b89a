//! Gap decomposition engine.
//!
//! A single pure function shared by every caller: the API server, the
//! backend consistency check, the CLI report and each slider move in the TUI.

use super::types::{EyaEstimate, GapDecomposition, OaResult, SensitivityAdjustment};

/// Upper clamp for an adjusted OA loss fraction.
pub const MAX_ADJUSTED_LOSS: f64 = 0.999;

/// Applies a sensitivity delta to a loss fraction, clamped to `[0, MAX_ADJUSTED_LOSS]`.
pub fn adjust_loss(loss: f64, delta: f64) -> f64 {
    (loss + delta).clamp(0.0, MAX_ADJUSTED_LOSS)
}

/// Decomposes the EYA/OA AEP gap into additive contributions.
///
/// With `adjustment == None`, or an all-zero adjustment, the OA loss fractions
/// are used as given, so the result matches the backend's initial
/// decomposition. The residual is solved
/// last by subtraction, which makes the bridge from EYA AEP to OA AEP exact up
/// to floating-point rounding.
///
/// # Arguments
///
/// * `eya` - EYA estimate
/// * `oa` - Operational assessment result
/// * `adjustment` - Optional sensitivity deltas on the OA loss fractions
///
/// # Examples
///
/// ```
/// use eya_gap::gap::engine::decompose;
/// use eya_gap::gap::types::{EyaEstimate, OaResult};
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
/// let oa = OaResult {
///     aep: 11.1,
///     turbine_ideal_energy: 13.6,
///     availability_losses: 0.041,
///     electrical_losses: 0.018,
/// };
/// let d = decompose(&eya, &oa, None);
/// assert!(d.bridge_error() < 1e-9);
/// ```
pub fn decompose(
    eya: &EyaEstimate,
    oa: &OaResult,
    adjustment: Option<&SensitivityAdjustment>,
) -> GapDecomposition {
    let eya_ideal_energy = eya.ideal_energy();

    let (adjusted_availability, adjusted_electrical) = match adjustment {
        Some(adj) if !adj.is_zero() => (
            adjust_loss(oa.availability_losses, adj.availability_delta),
            adjust_loss(oa.electrical_losses, adj.electrical_delta),
        ),
        _ => (oa.availability_losses, oa.electrical_losses),
    };

    let turbine_ideal_diff = oa.turbine_ideal_energy - eya_ideal_energy;
    let availability_diff = (eya.availability_losses - adjusted_availability) * eya_ideal_energy;
    let electrical_diff = (eya.electrical_losses - adjusted_electrical) * eya_ideal_energy;
    let unexplained_residual =
        oa.aep - (eya.aep + turbine_ideal_diff + availability_diff + electrical_diff);

    let gap = oa.aep - eya.aep;
    let gap_percent = if eya.aep == 0.0 {
        None
    } else {
        Some(100.0 * gap / eya.aep)
    };

    GapDecomposition {
        eya_aep: eya.aep,
        oa_aep: oa.aep,
        eya_ideal_energy,
        turbine_ideal_diff,
        availability_diff,
        electrical_diff,
        unexplained_residual,
        adjusted_availability_losses: adjusted_availability,
        adjusted_electrical_losses: adjusted_electrical,
        gap,
        gap_percent,
    }
}

//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use eya_gap::gap::types::{EyaEstimate, OaResult};

/// Tolerance for the EYA to OA bridge closing.
pub const BRIDGE_TOLERANCE: f64 = 1e-9;

/// Reference EYA estimate (12.4 GWh/yr AEP, 15.2 GWh/yr gross).
pub fn reference_eya() -> EyaEstimate {
    EyaEstimate {
        aep: 12.4,
        gross_energy: 15.2,
        availability_losses: 0.032,
        electrical_losses: 0.015,
        turbine_losses: 0.04,
        blade_degradation_losses: 0.01,
        wake_losses: 0.08,
    }
}

/// Reference OA result (11.1 GWh/yr AEP, ~10.5% below the EYA).
pub fn reference_oa() -> OaResult {
    OaResult {
        aep: 11.1,
        turbine_ideal_energy: 13.6,
        availability_losses: 0.041,
        electrical_losses: 0.018,
    }
}

/// Sensitivity deltas spanning the default slider range at coarse steps.
pub fn delta_grid() -> Vec<f64> {
    (-10..=10).map(|i| f64::from(i) * 0.005).collect()
}

/// Asserts `actual` is within `tol` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual} (tol {tol})"
    );
}

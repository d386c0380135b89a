//! Boundary validation of user-entered EYA and OA figures.
//!
//! The engine itself accepts anything; callers run these checks before
//! decomposing so out-of-range entries are rejected rather than clamped.

use thiserror::Error;

use super::types::{EyaEstimate, OaResult};

/// An input field that failed boundary validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Value is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    /// Energy value must be strictly positive.
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    /// Loss fraction outside the half-open interval `[0, 1)`.
    #[error("{field} must be in [0, 1), got {value}")]
    LossOutOfRange { field: &'static str, value: f64 },
    /// EYA loss fractions leave no energy at all.
    #[error("sum of all EYA loss fractions ({total:.4}) must be < 1.0")]
    LossSumTooLarge { total: f64 },
}

impl InputError {
    /// Dotted path of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotFinite { field, .. }
            | Self::NotPositive { field, .. }
            | Self::LossOutOfRange { field, .. } => field,
            Self::LossSumTooLarge { .. } => "eya",
        }
    }
}

fn check_energy(errors: &mut Vec<InputError>, field: &'static str, value: f64) {
    if !value.is_finite() {
        errors.push(InputError::NotFinite { field, value });
    } else if value <= 0.0 {
        errors.push(InputError::NotPositive { field, value });
    }
}

fn check_loss(errors: &mut Vec<InputError>, field: &'static str, value: f64) {
    if !value.is_finite() {
        errors.push(InputError::NotFinite { field, value });
    } else if !(0.0..1.0).contains(&value) {
        errors.push(InputError::LossOutOfRange { field, value });
    }
}

/// Validates an EYA estimate and returns every problem found.
///
/// Returns an empty vector if the estimate is valid.
pub fn validate_eya(eya: &EyaEstimate) -> Vec<InputError> {
    let mut errors = Vec::new();
    check_energy(&mut errors, "eya.aep", eya.aep);
    check_energy(&mut errors, "eya.gross_energy", eya.gross_energy);

    let losses = [
        ("eya.availability_losses", eya.availability_losses),
        ("eya.electrical_losses", eya.electrical_losses),
        ("eya.turbine_losses", eya.turbine_losses),
        ("eya.blade_degradation_losses", eya.blade_degradation_losses),
        ("eya.wake_losses", eya.wake_losses),
    ];
    let before = errors.len();
    for (field, value) in losses {
        check_loss(&mut errors, field, value);
    }
    if errors.len() == before {
        let total: f64 = losses.iter().map(|(_, v)| v).sum();
        if total >= 1.0 {
            errors.push(InputError::LossSumTooLarge { total });
        }
    }
    errors
}

/// Validates an OA result and returns every problem found.
pub fn validate_oa(oa: &OaResult) -> Vec<InputError> {
    let mut errors = Vec::new();
    check_energy(&mut errors, "oa.aep", oa.aep);
    check_energy(&mut errors, "oa.turbine_ideal_energy", oa.turbine_ideal_energy);
    check_loss(&mut errors, "oa.availability_losses", oa.availability_losses);
    check_loss(&mut errors, "oa.electrical_losses", oa.electrical_losses);
    errors
}

/// Validates both inputs, EYA problems first.
pub fn validate_inputs(eya: &EyaEstimate, oa: &OaResult) -> Vec<InputError> {
    let mut errors = validate_eya(eya);
    errors.extend(validate_oa(oa));
    errors
}

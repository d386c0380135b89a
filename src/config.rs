//! TOML-based case configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::gap::types::{EyaEstimate, OaResult, SensitivityAdjustment};
use crate::gap::validate::validate_inputs;

/// Top-level gap-analysis case parsed from TOML.
///
/// All fields have defaults matching the reference case. Load from TOML with
/// [`CaseConfig::from_toml_file`] or use [`CaseConfig::reference`] for the
/// built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseConfig {
    /// EYA consultant estimates.
    #[serde(default)]
    pub eya: EyaConfig,
    /// Operational assessment results.
    #[serde(default)]
    pub oa: OaConfig,
    /// Initial slider positions and slider range.
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
    /// Analytics backend connection.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// EYA consultant estimates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EyaConfig {
    /// Predicted AEP (GWh/yr).
    pub aep: f64,
    /// Predicted gross energy (GWh/yr).
    pub gross_energy: f64,
    /// Availability loss fraction in [0, 1).
    pub availability_losses: f64,
    /// Electrical loss fraction in [0, 1).
    pub electrical_losses: f64,
    /// Turbine loss fraction in [0, 1).
    pub turbine_losses: f64,
    /// Blade degradation loss fraction in [0, 1).
    pub blade_degradation_losses: f64,
    /// Wake loss fraction in [0, 1).
    pub wake_losses: f64,
}

impl Default for EyaConfig {
    fn default() -> Self {
        Self {
            aep: 12.4,
            gross_energy: 15.2,
            availability_losses: 0.032,
            electrical_losses: 0.015,
            turbine_losses: 0.04,
            blade_degradation_losses: 0.01,
            wake_losses: 0.08,
        }
    }
}

/// Operational assessment results.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OaConfig {
    /// Measured AEP (GWh/yr).
    pub aep: f64,
    /// Turbine ideal energy (GWh/yr).
    pub turbine_ideal_energy: f64,
    /// Availability loss fraction in [0, 1).
    pub availability_losses: f64,
    /// Electrical loss fraction in [0, 1).
    pub electrical_losses: f64,
}

impl Default for OaConfig {
    fn default() -> Self {
        Self {
            aep: 11.1,
            turbine_ideal_energy: 13.6,
            availability_losses: 0.041,
            electrical_losses: 0.018,
        }
    }
}

/// Sensitivity slider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensitivityConfig {
    /// Initial availability delta.
    pub availability_delta: f64,
    /// Initial electrical delta.
    pub electrical_delta: f64,
    /// Slider increment per key press.
    pub step: f64,
    /// Sliders range over `[-max_delta, max_delta]`.
    pub max_delta: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            availability_delta: 0.0,
            electrical_delta: 0.0,
            step: 0.001,
            max_delta: 0.05,
        }
    }
}

/// Analytics backend connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:8000`. `None` runs fully offline.
    pub url: Option<String>,
    /// Allowed absolute difference per component between backend and local (GWh/yr).
    pub tolerance: f64,
    /// Request timeout; transport default when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            tolerance: 1e-6,
            timeout_secs: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"eya.wake_losses"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl CaseConfig {
    /// Returns the reference case: a plant falling ~10.5% short of its EYA.
    pub fn reference() -> Self {
        Self {
            eya: EyaConfig::default(),
            oa: OaConfig::default(),
            sensitivity: SensitivityConfig::default(),
            backend: BackendConfig::default(),
        }
    }

    /// Returns a case whose OA lands close to the EYA.
    pub fn on_target() -> Self {
        Self {
            oa: OaConfig {
                aep: 12.1,
                turbine_ideal_energy: 13.4,
                availability_losses: 0.035,
                electrical_losses: 0.016,
            },
            ..Self::reference()
        }
    }

    /// Returns a case where the plant beats its EYA.
    pub fn outperforming() -> Self {
        Self {
            eya: EyaConfig {
                aep: 10.8,
                gross_energy: 13.5,
                availability_losses: 0.04,
                electrical_losses: 0.02,
                wake_losses: 0.09,
                ..EyaConfig::default()
            },
            oa: OaConfig {
                aep: 11.6,
                turbine_ideal_energy: 12.3,
                availability_losses: 0.022,
                electrical_losses: 0.014,
            },
            ..Self::reference()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "on_target", "outperforming"];

    /// Loads a case from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "on_target" => Ok(Self::on_target()),
            "outperforming" => Ok(Self::outperforming()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a case from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "case".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), "loaded case file");
        Self::from_toml_str(&content)
    }

    /// Parses a case from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// The EYA estimate described by this case.
    pub fn eya(&self) -> EyaEstimate {
        let e = &self.eya;
        EyaEstimate {
            aep: e.aep,
            gross_energy: e.gross_energy,
            availability_losses: e.availability_losses,
            electrical_losses: e.electrical_losses,
            turbine_losses: e.turbine_losses,
            blade_degradation_losses: e.blade_degradation_losses,
            wake_losses: e.wake_losses,
        }
    }

    /// The OA result described by this case.
    pub fn oa(&self) -> OaResult {
        let o = &self.oa;
        OaResult {
            aep: o.aep,
            turbine_ideal_energy: o.turbine_ideal_energy,
            availability_losses: o.availability_losses,
            electrical_losses: o.electrical_losses,
        }
    }

    /// The initial sensitivity adjustment.
    pub fn adjustment(&self) -> SensitivityAdjustment {
        SensitivityAdjustment::new(
            self.sensitivity.availability_delta,
            self.sensitivity.electrical_delta,
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = validate_inputs(&self.eya(), &self.oa())
            .into_iter()
            .map(|e| ConfigError {
                field: e.field().to_string(),
                message: e.to_string(),
            })
            .collect();

        let s = &self.sensitivity;
        if !(s.max_delta > 0.0 && s.max_delta < 1.0) {
            errors.push(ConfigError {
                field: "sensitivity.max_delta".into(),
                message: "must be in (0, 1)".into(),
            });
        }
        if !(s.step > 0.0 && s.step <= s.max_delta) {
            errors.push(ConfigError {
                field: "sensitivity.step".into(),
                message: "must be > 0 and <= sensitivity.max_delta".into(),
            });
        }
        for (field, delta) in [
            ("sensitivity.availability_delta", s.availability_delta),
            ("sensitivity.electrical_delta", s.electrical_delta),
        ] {
            if !delta.is_finite() || delta.abs() > s.max_delta {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be within [-sensitivity.max_delta, sensitivity.max_delta]"
                        .into(),
                });
            }
        }

        let b = &self.backend;
        if let Some(url) = &b.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(ConfigError {
                    field: "backend.url".into(),
                    message: format!("must start with http:// or https://, got \"{url}\""),
                });
            }
        }
        if !(b.tolerance > 0.0) {
            errors.push(ConfigError {
                field: "backend.tolerance".into(),
                message: "must be > 0".into(),
            });
        }
        if b.timeout_secs == Some(0) {
            errors.push(ConfigError {
                field: "backend.timeout_secs".into(),
                message: "must be > 0 when set".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_preset_valid() {
        let cfg = CaseConfig::reference();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "reference should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = CaseConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert_eq!(e.field, "preset");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in CaseConfig::PRESETS {
            let cfg = CaseConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[eya]
aep = 50.0
gross_energy = 62.0
availability_losses = 0.03
electrical_losses = 0.02
turbine_losses = 0.035
blade_degradation_losses = 0.005
wake_losses = 0.1

[oa]
aep = 47.5
turbine_ideal_energy = 51.2
availability_losses = 0.045
electrical_losses = 0.021

[sensitivity]
availability_delta = -0.01
step = 0.0025
max_delta = 0.04

[backend]
url = "http://localhost:8000"
tolerance = 0.0001
timeout_secs = 30
"#;
        let cfg = CaseConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.eya.aep), Some(50.0));
        assert_eq!(cfg.as_ref().map(|c| c.oa.turbine_ideal_energy), Some(51.2));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.backend.url.as_deref()),
            Some("http://localhost:8000")
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.adjustment()),
            Some(SensitivityAdjustment::new(-0.01, 0.0))
        );
        let errors = cfg.map(|c| c.validate()).unwrap_or_default();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[eya]
aep = 12.0
bogus_field = true
"#;
        assert!(CaseConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[oa]
aep = 12.0
"#;
        let cfg = CaseConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.oa.aep), Some(12.0));
        // untouched OA fields keep their defaults
        assert_eq!(cfg.as_ref().map(|c| c.oa.turbine_ideal_energy), Some(13.6));
        assert_eq!(cfg.as_ref().map(|c| c.eya.gross_energy), Some(15.2));
        assert!(cfg.as_ref().is_some_and(|c| c.backend.url.is_none()));
    }

    #[test]
    fn validation_rejects_loss_of_one() {
        let mut cfg = CaseConfig::reference();
        cfg.oa.availability_losses = 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "oa.availability_losses"));
    }

    #[test]
    fn validation_catches_delta_outside_range() {
        let mut cfg = CaseConfig::reference();
        cfg.sensitivity.electrical_delta = 0.2;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sensitivity.electrical_delta"));
    }

    #[test]
    fn validation_catches_bad_backend_url() {
        let mut cfg = CaseConfig::reference();
        cfg.backend.url = Some("localhost:8000".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "backend.url"));
    }

    #[test]
    fn outperforming_beats_its_eya() {
        let cfg = CaseConfig::outperforming();
        assert!(cfg.oa.aep > cfg.eya.aep);
    }
}

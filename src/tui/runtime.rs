//! TUI application state for the sensitivity what-if.

use std::path::PathBuf;

use crate::config::CaseConfig;
use crate::gap::engine::decompose;
use crate::gap::types::{EyaEstimate, OaResult, SensitivityAdjustment};
use crate::io::export::export_csv;
use crate::reporting::GapReport;

/// Default export target for the `e` key.
pub const DEFAULT_EXPORT_PATH: &str = "eya_gap_export.csv";

/// Which sensitivity slider has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Availability,
    Electrical,
}

impl Slider {
    /// The other slider.
    pub fn toggled(self) -> Self {
        match self {
            Self::Availability => Self::Electrical,
            Self::Electrical => Self::Availability,
        }
    }
}

/// TUI application state.
///
/// Inputs are held as explicit values; the report is rebuilt through
/// [`decompose`] after every change and never patched in place.
pub struct App {
    /// Current case configuration (kept for preset switch and reset).
    case: CaseConfig,
    /// Case the app was launched with, restored by `r`.
    launch: (CaseConfig, String),
    /// EYA estimate of the active case.
    pub eya: EyaEstimate,
    /// OA result of the active case.
    pub oa: OaResult,
    /// Current slider positions.
    pub adjustment: SensitivityAdjustment,
    /// Decomposition, waterfall, and health for the current inputs.
    pub report: GapReport,
    /// Slider receiving left/right input.
    pub selected: Slider,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Name of the active preset or case file.
    pub case_name: String,
    /// One-line feedback shown in the footer (export result).
    pub message: Option<String>,
    /// Where `e` writes the CSV export.
    pub export_path: PathBuf,
}

impl App {
    /// Creates a new app for a loaded case.
    pub fn new(case: CaseConfig, case_name: &str) -> Self {
        let eya = case.eya();
        let oa = case.oa();
        let adjustment = case.adjustment();
        let report = GapReport::new(decompose(&eya, &oa, Some(&adjustment)));
        Self {
            launch: (case.clone(), case_name.to_string()),
            case,
            eya,
            oa,
            adjustment,
            report,
            selected: Slider::Availability,
            quit: false,
            case_name: case_name.to_string(),
            message: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    /// Creates a new app from a preset name, falling back to the reference case.
    pub fn from_preset(preset: &str) -> Self {
        match CaseConfig::from_preset(preset) {
            Ok(case) => Self::new(case, preset),
            Err(_) => Self::new(CaseConfig::reference(), "reference"),
        }
    }

    fn recompute(&mut self) {
        self.report = GapReport::new(decompose(&self.eya, &self.oa, Some(&self.adjustment)));
    }

    /// Slider increment.
    pub fn step(&self) -> f64 {
        self.case.sensitivity.step
    }

    /// Slider half-range.
    pub fn max_delta(&self) -> f64 {
        self.case.sensitivity.max_delta
    }

    /// Current delta of a slider.
    pub fn delta(&self, slider: Slider) -> f64 {
        match slider {
            Slider::Availability => self.adjustment.availability_delta,
            Slider::Electrical => self.adjustment.electrical_delta,
        }
    }

    /// Moves the selected slider by `steps` increments within the slider range.
    ///
    /// The result is snapped to the step grid so repeated moves do not drift.
    pub fn nudge(&mut self, steps: i32) {
        let step = self.step();
        let max = self.max_delta();
        let current = self.delta(self.selected);
        let raw = current + f64::from(steps) * step;
        let snapped = ((raw / step).round() * step).clamp(-max, max);
        match self.selected {
            Slider::Availability => self.adjustment.availability_delta = snapped,
            Slider::Electrical => self.adjustment.electrical_delta = snapped,
        }
        self.message = None;
        self.recompute();
    }

    /// Switches focus to the other slider.
    pub fn toggle_slider(&mut self) {
        self.selected = self.selected.toggled();
    }

    /// Returns both sliders to zero.
    pub fn reset_sliders(&mut self) {
        self.adjustment = SensitivityAdjustment::default();
        self.message = None;
        self.recompute();
    }

    /// Switches to a different preset, resetting slider state.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(case) = CaseConfig::from_preset(name) else {
            return;
        };
        self.replace_case(case, name);
    }

    /// Returns to the case the app was launched with, including its
    /// initial slider positions.
    pub fn restore_launch_case(&mut self) {
        let (case, name) = self.launch.clone();
        self.replace_case(case, &name);
    }

    fn replace_case(&mut self, case: CaseConfig, name: &str) {
        let export_path = std::mem::take(&mut self.export_path);
        let launch = std::mem::replace(&mut self.launch, (CaseConfig::reference(), String::new()));
        *self = Self::new(case, name);
        self.export_path = export_path;
        self.launch = launch;
    }

    /// Writes the current decomposition to `export_path`.
    pub fn export(&mut self) {
        let result = export_csv(
            &self.eya,
            &self.oa,
            &self.report.decomposition,
            &self.export_path,
        );
        self.message = Some(match result {
            Ok(()) => format!("exported to {}", self.export_path.display()),
            Err(e) => format!("export failed: {e}"),
        });
    }
}

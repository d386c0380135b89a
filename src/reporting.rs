//! Display formatting for decompositions, waterfalls, and health.
//!
//! Formatting only ever reads the raw values; nothing here feeds back into
//! the decomposition.

use std::fmt;

use crate::gap::health::{HealthStatus, classify_health};
use crate::gap::types::GapDecomposition;
use crate::gap::waterfall::{BAR_COUNT, WaterfallBar, build_waterfall};

/// Shown in place of a gap percentage when EYA AEP is zero.
pub const UNDEFINED: &str = "undefined";

/// Formats a percentage value to 2 decimals, e.g. `-10.48%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats a loss fraction as a percentage, e.g. `0.041` → `4.10%`.
pub fn format_fraction(fraction: f64) -> String {
    format_percent(fraction * 100.0)
}

/// Formats an energy value to 3 decimals, e.g. `11.100 GWh`.
pub fn format_gwh(value: f64) -> String {
    format!("{value:.3} GWh")
}

/// Formats an energy delta with an explicit sign, e.g. `+0.310 GWh`.
pub fn format_signed_gwh(value: f64) -> String {
    format!("{value:+.3} GWh")
}

/// Formats an optional gap percentage, `undefined` when absent.
pub fn format_gap_percent(gap_percent: Option<f64>) -> String {
    gap_percent.map_or_else(|| UNDEFINED.to_string(), format_percent)
}

/// A decomposition bundled with its waterfall and health tier, ready to print.
#[derive(Debug, Clone)]
pub struct GapReport {
    pub decomposition: GapDecomposition,
    pub bars: [WaterfallBar; BAR_COUNT],
    /// `None` when the gap percentage is undefined.
    pub health: Option<HealthStatus>,
}

impl GapReport {
    pub fn new(decomposition: GapDecomposition) -> Self {
        Self {
            bars: build_waterfall(&decomposition),
            health: decomposition.gap_percent.map(classify_health),
            decomposition,
        }
    }

    /// Health label, or `undefined`.
    pub fn health_label(&self) -> &'static str {
        self.health.map_or(UNDEFINED, HealthStatus::label)
    }
}

impl fmt::Display for GapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.decomposition;
        writeln!(f, "--- EYA Gap Report ---")?;
        writeln!(f, "EYA AEP:               {}", format_gwh(d.eya_aep))?;
        writeln!(f, "OA AEP:                {}", format_gwh(d.oa_aep))?;
        writeln!(
            f,
            "Gap:                   {} ({})",
            format_signed_gwh(d.gap),
            format_gap_percent(d.gap_percent)
        )?;
        writeln!(f, "Health:                {}", self.health_label())?;
        writeln!(f, "EYA ideal energy:      {}", format_gwh(d.eya_ideal_energy))?;
        writeln!(
            f,
            "OA losses (adjusted):  availability {}, electrical {}",
            format_fraction(d.adjusted_availability_losses),
            format_fraction(d.adjusted_electrical_losses)
        )?;
        writeln!(f)?;
        writeln!(f, "--- Waterfall ---")?;
        for (i, bar) in self.bars.iter().enumerate() {
            let value = if bar.is_total {
                format_gwh(bar.signed_value)
            } else {
                format_signed_gwh(bar.signed_value)
            };
            write!(
                f,
                "{:<22} {:>14}   [{:.3} .. {:.3}]",
                bar.label,
                value,
                bar.base,
                bar.top()
            )?;
            if i + 1 < self.bars.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::engine::decompose;
    use crate::gap::types::{EyaEstimate, OaResult};

    fn report() -> GapReport {
        let eya = EyaEstimate {
            aep: 12.4,
            gross_energy: 15.2,
            availability_losses: 0.032,
            electrical_losses: 0.015,
            turbine_losses: 0.04,
            blade_degradation_losses: 0.01,
            wake_losses: 0.08,
        };
        let oa = OaResult {
            aep: 11.1,
            turbine_ideal_energy: 13.6,
            availability_losses: 0.041,
            electrical_losses: 0.018,
        };
        GapReport::new(decompose(&eya, &oa, None))
    }

    #[test]
    fn number_formats() {
        assert_eq!(format_percent(-10.483_870_967), "-10.48%");
        assert_eq!(format_fraction(0.041), "4.10%");
        assert_eq!(format_gwh(11.1), "11.100 GWh");
        assert_eq!(format_signed_gwh(0.309_606_4), "+0.310 GWh");
        assert_eq!(format_signed_gwh(-1.45), "-1.450 GWh");
        assert_eq!(format_gap_percent(None), "undefined");
    }

    #[test]
    fn formatting_does_not_touch_raw_values() {
        let r = report();
        let before = r.decomposition;
        let _ = r.to_string();
        assert_eq!(r.decomposition, before);
        assert!(r.decomposition.bridge_error() < 1e-12);
    }

    #[test]
    fn report_lists_every_bar_and_health() {
        let text = report().to_string();
        for label in crate::gap::waterfall::BAR_LABELS {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(text.contains("Significant Underperformance"));
        assert!(text.contains("-10.48%"));
    }
}

//! Waterfall chart bars built from a gap decomposition.

use serde::Serialize;

use super::types::GapDecomposition;

/// Number of bars in a gap waterfall.
pub const BAR_COUNT: usize = 6;

/// Bar labels in chart order.
pub const BAR_LABELS: [&str; BAR_COUNT] = [
    "EYA AEP",
    "Turbine Ideal Energy",
    "Availability",
    "Electrical",
    "Unexplained",
    "OA AEP",
];

/// One floating bar of the waterfall chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterfallBar {
    /// Fixed label for the bar position.
    pub label: &'static str,
    /// Y-axis floor of the bar (GWh/yr).
    pub base: f64,
    /// Bar extent above `base`, always >= 0 for intermediate bars (GWh/yr).
    pub height: f64,
    /// Raw contribution, negative for a loss against the EYA.
    pub signed_value: f64,
    /// `true` for the EYA AEP and OA AEP bars.
    pub is_total: bool,
}

impl WaterfallBar {
    /// Y-axis top of the bar.
    pub fn top(&self) -> f64 {
        self.base + self.height
    }
}

/// Builds the six waterfall bars for a decomposition.
///
/// Intermediate bars float on the running total: a gain starts at the old
/// total and rises, a loss is drawn from the new lower total up to the old
/// one. The last bar is the running total after all four components, which
/// equals `decomposition.oa_aep` up to rounding.
pub fn build_waterfall(decomposition: &GapDecomposition) -> [WaterfallBar; BAR_COUNT] {
    let mut running = decomposition.eya_aep;
    let first = WaterfallBar {
        label: BAR_LABELS[0],
        base: 0.0,
        height: running,
        signed_value: running,
        is_total: true,
    };

    let components = decomposition.components();
    let mut middle = [first; 4];
    for (i, &v) in components.iter().enumerate() {
        let (base, height) = if v >= 0.0 {
            let base = running;
            running += v;
            (base, v)
        } else {
            running += v;
            (running, -v)
        };
        middle[i] = WaterfallBar {
            label: BAR_LABELS[i + 1],
            base,
            height,
            signed_value: v,
            is_total: false,
        };
    }

    let last = WaterfallBar {
        label: BAR_LABELS[5],
        base: 0.0,
        height: running,
        signed_value: running,
        is_total: true,
    };

    [first, middle[0], middle[1], middle[2], middle[3], last]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_decomposition(components: [f64; 4], eya_aep: f64) -> GapDecomposition {
        let oa_aep = eya_aep + components.iter().sum::<f64>();
        GapDecomposition {
            eya_aep,
            oa_aep,
            eya_ideal_energy: 13.0,
            turbine_ideal_diff: components[0],
            availability_diff: components[1],
            electrical_diff: components[2],
            unexplained_residual: components[3],
            adjusted_availability_losses: 0.04,
            adjusted_electrical_losses: 0.02,
            gap: oa_aep - eya_aep,
            gap_percent: Some(100.0 * (oa_aep - eya_aep) / eya_aep),
        }
    }

    #[test]
    fn labels_and_totals_are_fixed() {
        let bars = build_waterfall(&make_decomposition([0.3, -0.1, -0.04, -1.4], 12.4));
        let labels: Vec<&str> = bars.iter().map(|b| b.label).collect();
        assert_eq!(labels, BAR_LABELS);
        let totals: Vec<bool> = bars.iter().map(|b| b.is_total).collect();
        assert_eq!(totals, [true, false, false, false, false, true]);
        assert_eq!(bars[0].base, 0.0);
        assert_eq!(bars[5].base, 0.0);
    }

    #[test]
    fn positive_step_starts_at_running_total() {
        let bars = build_waterfall(&make_decomposition([0.5, 0.0, 0.0, 0.0], 10.0));
        assert_eq!(bars[1].base, 10.0);
        assert_eq!(bars[1].height, 0.5);
        assert!((bars[1].top() - 10.5).abs() < 1e-12);
    }

    #[test]
    fn negative_step_hangs_from_previous_total() {
        let bars = build_waterfall(&make_decomposition([0.5, -2.0, 0.0, 0.0], 10.0));
        // running: 10.0 -> 10.5 -> 8.5
        assert!((bars[2].base - 8.5).abs() < 1e-12);
        assert!((bars[2].height - 2.0).abs() < 1e-12);
        assert!((bars[2].top() - 10.5).abs() < 1e-12);
        assert_eq!(bars[2].signed_value, -2.0);
    }

    #[test]
    fn intermediate_heights_are_non_negative() {
        let bars = build_waterfall(&make_decomposition([-0.3, 0.2, -0.05, 0.7], 8.0));
        for bar in &bars[1..5] {
            assert!(bar.height >= 0.0, "{} has negative height", bar.label);
        }
    }

    #[test]
    fn final_bar_conserves_running_total() {
        let d = make_decomposition([0.31, -0.12, -0.04, -1.45], 12.4);
        let bars = build_waterfall(&d);
        assert!((bars[5].height - d.oa_aep).abs() < 1e-9);
        // the last intermediate bar ends on the final total
        let last_step = bars[4];
        let end = if last_step.signed_value >= 0.0 {
            last_step.top()
        } else {
            last_step.base
        };
        assert!((end - bars[5].height).abs() < 1e-12);
    }
}

//! Three-tier health classification of the AEP gap.

use std::fmt;

use serde::Serialize;

/// Upper bound (inclusive) of `|gap %|` for "Within Expectations".
pub const WITHIN_EXPECTATIONS_PCT: f64 = 5.0;
/// Upper bound (inclusive) of `|gap %|` for "Investigate".
pub const INVESTIGATE_PCT: f64 = 10.0;

/// Health tier of a gap, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HealthStatus {
    WithinExpectations,
    Investigate,
    SignificantUnderperformance,
}

impl HealthStatus {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::WithinExpectations => "Within Expectations",
            Self::Investigate => "Investigate",
            Self::SignificantUnderperformance => "Significant Underperformance",
        }
    }

    /// 0 for the most lenient tier, 2 for the most severe.
    pub fn severity_rank(self) -> u8 {
        match self {
            Self::WithinExpectations => 0,
            Self::Investigate => 1,
            Self::SignificantUnderperformance => 2,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a gap percentage, ignoring its sign.
///
/// Boundary values fall in the less severe tier.
pub fn classify_health(gap_percent: f64) -> HealthStatus {
    let magnitude = gap_percent.abs();
    if magnitude <= WITHIN_EXPECTATIONS_PCT {
        HealthStatus::WithinExpectations
    } else if magnitude <= INVESTIGATE_PCT {
        HealthStatus::Investigate
    } else {
        HealthStatus::SignificantUnderperformance
    }
}

//! EYA vs operational assessment AEP gap analysis.
//!
//! Decomposes the gap between an Energy Yield Assessment and an Operational
//! Assessment into additive drivers, builds the matching waterfall, and
//! recomputes both locally under sensitivity adjustments.

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
/// Decomposition engine, waterfall builder, and health classification.
pub mod gap;
pub mod io;
pub mod logging;
pub mod reporting;
#[cfg(feature = "tui")]
pub mod tui;
pub mod wire;

/// Pure gap decomposition.
pub mod engine;
/// Gap health tiers.
pub mod health;
pub mod types;
pub mod validate;
pub mod waterfall;

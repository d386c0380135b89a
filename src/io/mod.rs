/// CSV export of gap decompositions.
pub mod export;

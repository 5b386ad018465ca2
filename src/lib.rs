//! Build tool for the snakedex: reads per-snake JSON records plus optional
//! PNG portraits, orders them by first appearance, derives resized image
//! variants, and emits three deterministic JSON listing files.

pub mod images;
pub mod listing;
pub mod ordering;
pub mod pipeline;
pub mod record;

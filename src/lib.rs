//! Bitcoin price history against a power-law regression with sigma bands.
//!
//! The pipeline is stateless: `raw series + window + mode -> bands ->
//! plot coordinates -> axis bounds`, recomputed in full on every change.
//! [`bands::generate_price_bands`] and [`coords::plot_data`] are the core;
//! [`feed`], [`export`] and [`progress`] are the ingestion and batch edges.

pub mod bands;
pub mod coords;
pub mod error;
pub mod export;
pub mod feed;
pub mod index;
pub mod model;
pub mod progress;
pub mod sampling;
pub mod ticks;
pub mod utils;
pub mod window;

pub use error::{Error, Result};

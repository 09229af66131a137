//! Legend styling for Piper plots.
//!
//! - `palette`: named categorical color palettes
//! - `marker`: marker kinds
//! - `assign`: the series style assigner
//! - `config`: style settings and their validation

pub mod assign;
pub mod config;
pub mod error;
pub mod marker;
pub mod palette;

pub use assign::{assign, distinct_values, single_series, Legend, StyleAssignment, StyleMode, StyleOverflow, StyleReport};
pub use config::{StyleConfig, Styler};
pub use error::StyleError;
pub use marker::{MarkerKind, DEFAULT_MARKERS};
pub use palette::{Palette, PaletteName};

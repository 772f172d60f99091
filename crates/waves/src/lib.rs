//! Wave model: the tunable parameter bundle and the elevation function.
//!
//! # Invariants
//! - `elevation` is pure: same inputs, same output, no hidden state.
//! - Parameters only change through validating setters, so every value held
//!   by a [`WaveParams`] lies inside its [`ParamRange`].

mod elevation;
mod params;

pub use elevation::{WaveTerms, elevation, wave_terms};
pub use params::{ParamRange, TweakError, WaveParam, WaveParams};

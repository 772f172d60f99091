//! Developer tweak panel: one control per wave parameter.
//!
//! # Invariants
//! - Edits only reach [`WaveParams`](seaside_waves::WaveParams) through its
//!   validating setters; a rejected edit leaves the parameter unchanged.
//! - The panel starts collapsed.

mod panel;

pub use panel::{PANEL_WIDTH, TweakOutcome, TweakPanel};

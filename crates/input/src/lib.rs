//! Input actions: window-system events mapped to platform-neutral actions.
//!
//! # Invariants
//! - The scene consumes actions, never raw window events.

pub mod action;

pub use action::{Action, PointerButton};

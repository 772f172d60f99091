//! Shared value types used across the seaside crates.

mod color;
mod types;

pub use color::{ColorParseError, Rgb};
pub use types::Pose;

//! Shared value types used across the phongview crates.

mod types;

pub use types::{CameraMovement, Transform};

pub fn crate_info() -> &'static str {
    "phongview-common v0.1.0"
}

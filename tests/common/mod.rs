//! Common utilities for integration tests
#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{CubeRoot, DiodeLike, OffsetParabola};
pub use test_helpers::{assert_all_close, reference_mpp, relative_error};

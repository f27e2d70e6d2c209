//! Validation utilities for grid indices and file layout
//!
//! Pure functions with no I/O dependencies.

pub mod bounds;
pub mod format;

pub use bounds::{checked_cells, clamp_index, wrap_index};
pub use format::validate_file;

#![no_std]

//! mmgrid core - on-disk grid format definitions
//!
//! This crate provides the binary layout of persistent grid files, the
//! element trait shared by every grid, structured error codes and pure
//! validation arithmetic. It performs no I/O.

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::{checked_cells, clamp_index, validate_file, wrap_index};

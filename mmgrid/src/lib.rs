//! mmgrid - uniform grid access over memory-mapped and in-memory storage
//!
//! Many storage kinds share one indexable-grid contract, and transformations
//! of a grid (sub-region, transpose, reordering, padding, concatenation) are
//! zero-copy views composed on top of it.
//!
//! ## Architecture
//!
//! mmgrid follows a specification/implementation separation:
//!
//! - **mmgrid-core**: file format, element types and validation (no I/O)
//! - **mmgrid**: the access contract, leaves, views, shared handles and the
//!   cross-process mutex
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mmgrid::views::ViewExt;
//! use mmgrid::{Expression, ExpressionMut, LockStatus, Matrix, Shared};
//!
//! fn example() -> mmgrid::Result<()> {
//!     // A persistent 100 x 100 grid in the scratch directory
//!     let matrix = Shared::new(Matrix::new(100, 100, 0.0f64)?);
//!
//!     // Writes through a transposed region land in the file
//!     let mut corner = matrix.clone().roi(0, 0, 9, 9).transpose();
//!     corner.set(0, 1, 2.5);
//!     assert_eq!(matrix.at(1, 0), 2.5);
//!
//!     // Other processes coordinate through the embedded mutex
//!     let m = matrix.borrow().unwrap();
//!     if m.lock()? == LockStatus::OwnerDied {
//!         m.mark_consistent()?;
//!     }
//!     m.unlock()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Persistent grids**: `Matrix`/`Matrix3d` files that grow, reopen and
//!   alias across processes
//! - **Robust locking**: owner death is reported instead of deadlocking
//! - **Views**: ROI, transpose, selection, border, augmentation, permutation
//! - **Shared handles**: reference-counted, mutable or read-only

pub use mmgrid_core::{Dims, GridElement, GridError};

pub mod array;
pub mod config;
pub mod error;
pub mod expression;
pub mod labels;
pub mod mmap_backend;
pub mod shared;
pub mod sync;
pub mod views;

pub use array::{Array, Array3d};
pub use config::{StorageConfig, SCRATCH_DIR_ENV};
pub use error::{Error, Result};
pub use expression::{
    evaluate, evaluate3d, to_vec, Expression, Expression3d, Expression3dMut, ExpressionMut,
};
pub use labels::{Labeled, NameTable};
pub use mmap_backend::{GridFile, GridKind, Matrix, Matrix3d};
pub use shared::{Shared, SharedConst};
pub use sync::{LockGuard, LockStatus};

//! Abstract interfaces shared by every grid implementation

pub mod element;

pub use element::GridElement;

//! Error codes for grid format operations

/// Errors that can occur while validating or laying out grid files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// File is smaller than an empty header plus footer
    FileTooSmall,
    /// Header or footer magic token does not match
    InvalidMagic,
    /// Stored element size differs from the requested element type
    ElementSizeMismatch,
    /// Declared dimensions need more bytes than the file holds
    SizeMismatch,
    /// Dimensions overflow the addressable byte range
    DimensionOverflow,
    /// Buffer too short to hold the structure being parsed
    InsufficientBuffer,
    /// Element count does not match the requested shape
    ShapeMismatch,
}

impl GridError {
    /// Stable numeric code for callers that report errors across boundaries
    pub const fn code(self) -> i32 {
        match self {
            GridError::FileTooSmall => 1,
            GridError::InvalidMagic => 2,
            GridError::ElementSizeMismatch => 3,
            GridError::SizeMismatch => 4,
            GridError::DimensionOverflow => 5,
            GridError::InsufficientBuffer => 6,
            GridError::ShapeMismatch => 7,
        }
    }
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            GridError::FileTooSmall => "File too small for grid header and footer",
            GridError::InvalidMagic => "Invalid grid magic token",
            GridError::ElementSizeMismatch => "Element size does not match file",
            GridError::SizeMismatch => "Declared dimensions exceed file size",
            GridError::DimensionOverflow => "Grid dimensions overflow",
            GridError::InsufficientBuffer => "Insufficient buffer space",
            GridError::ShapeMismatch => "Element count does not match shape",
        };
        write!(f, "{msg}")
    }
}

/// Result type for grid format operations
pub type Result<T> = core::result::Result<T, GridError>;

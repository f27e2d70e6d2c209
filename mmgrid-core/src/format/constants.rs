//! Format constants and magic tokens for grid files

/// Length of every magic token
pub const MAGIC_LEN: usize = 16;

/// Bytes reserved in each header for the embedded cross-process mutex
pub const LOCK_REGION_SIZE: usize = 128;

/// Size of the trailing footer
pub const FOOTER_SIZE: usize = MAGIC_LEN;

/// 2-D matrix tokens
pub mod matrix {
    use super::MAGIC_LEN;

    pub const HEADER_MAGIC: [u8; MAGIC_LEN] = *b"::---begin---::\n";
    pub const FOOTER_MAGIC: [u8; MAGIC_LEN] = *b"::----end----::\n";
}

/// 3-D matrix tokens
pub mod matrix3d {
    use super::MAGIC_LEN;

    pub const HEADER_MAGIC: [u8; MAGIC_LEN] = *b"---begin_3d_---\n";
    pub const FOOTER_MAGIC: [u8; MAGIC_LEN] = *b":---end_3d_---:\n";
}

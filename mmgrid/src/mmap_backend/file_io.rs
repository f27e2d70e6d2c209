//! Header-only inspection of grid files

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use mmgrid_core::{
    capacity, parse_header, Dims, GridError, GridHeader, Matrix3dHeader, MatrixHeader,
    FOOTER_SIZE, MAGIC_LEN,
};

use crate::{Error, Result};

/// Which header a grid file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridKind {
    Matrix,
    Matrix3d,
}

/// Summary of a grid file read without mapping its cells
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridFile {
    pub path: PathBuf,
    pub kind: GridKind,
    pub element_size: u64,
    pub dims: Dims,
    pub file_size: u64,
    /// Cells the file can hold at its current size
    pub capacity: u64,
    /// Whether the file ends with the footer token matching its header
    pub footer_valid: bool,
}

impl GridFile {
    /// Read the header of `path` and detect the grid kind from its magic
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(Error::io("failed to open grid file"))?;
        let file_size = file
            .metadata()
            .map_err(Error::io("failed to stat grid file"))?
            .len();

        let mut buffer = [0u8; <Matrix3dHeader as GridHeader>::SIZE];
        let available = (file_size as usize).min(buffer.len());
        file.read_exact(&mut buffer[..available])
            .map_err(Error::io("failed to read grid header"))?;
        let bytes = &buffer[..available];

        if bytes.len() < MAGIC_LEN {
            return Err(GridError::FileTooSmall.into());
        }
        let (kind, element_size, dims, footer, data_capacity) =
            if bytes[..MAGIC_LEN] == MatrixHeader::MAGIC {
                let header = parse_header::<MatrixHeader>(bytes)?;
                (
                    GridKind::Matrix,
                    header.element_size(),
                    header.dims(),
                    MatrixHeader::FOOTER_MAGIC,
                    capacity::<MatrixHeader>(file_size, header.element_size()),
                )
            } else if bytes[..MAGIC_LEN] == Matrix3dHeader::MAGIC {
                let header = parse_header::<Matrix3dHeader>(bytes)?;
                (
                    GridKind::Matrix3d,
                    header.element_size(),
                    header.dims(),
                    Matrix3dHeader::FOOTER_MAGIC,
                    capacity::<Matrix3dHeader>(file_size, header.element_size()),
                )
            } else {
                return Err(GridError::InvalidMagic.into());
            };

        let footer_valid = read_footer(&mut file, file_size)? == Some(footer);

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            element_size,
            dims,
            file_size,
            capacity: data_capacity,
            footer_valid,
        })
    }
}

fn read_footer(file: &mut File, file_size: u64) -> Result<Option<[u8; FOOTER_SIZE]>> {
    if file_size < FOOTER_SIZE as u64 {
        return Ok(None);
    }
    let mut footer = [0u8; FOOTER_SIZE];
    file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))
        .map_err(Error::io("failed to seek to grid footer"))?;
    file.read_exact(&mut footer)
        .map_err(Error::io("failed to read grid footer"))?;
    Ok(Some(footer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, Matrix3d, StorageConfig};
    use tempfile::TempDir;

    #[test]
    fn test_inspect_matrix() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::with_scratch_dir(dir.path());
        let matrix = Matrix::with_config(3, 5, 1.0f32, config).unwrap();

        let info = GridFile::inspect(matrix.path().unwrap()).unwrap();
        assert_eq!(info.kind, GridKind::Matrix);
        assert_eq!(info.element_size, 4);
        assert_eq!(info.dims, Dims::new(3, 5));
        assert_eq!(info.capacity, 15);
        assert!(info.footer_valid);
    }

    #[test]
    fn test_inspect_matrix3d() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::with_scratch_dir(dir.path());
        let cube = Matrix3d::with_config(2, 3, 4, 0u16, config).unwrap();

        let info = GridFile::inspect(cube.path().unwrap()).unwrap();
        assert_eq!(info.kind, GridKind::Matrix3d);
        assert_eq!(info.dims, Dims::new_3d(2, 3, 4));
        assert_eq!(info.file_size, 176 + 24 * 2 + 16);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.grid");
        std::fs::write(&path, vec![7u8; 300]).unwrap();
        assert!(matches!(
            GridFile::inspect(&path),
            Err(Error::Format(GridError::InvalidMagic))
        ));

        std::fs::write(&path, b"short").unwrap();
        assert!(matches!(
            GridFile::inspect(&path),
            Err(Error::Format(GridError::FileTooSmall))
        ));
    }
}

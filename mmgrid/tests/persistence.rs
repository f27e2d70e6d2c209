use mmgrid::{
    to_vec, Error, Expression, Expression3d, Expression3dMut, ExpressionMut, GridError, Matrix,
    Matrix3d, StorageConfig,
};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tempfile::TempDir;

fn scratch() -> (TempDir, StorageConfig) {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::with_scratch_dir(dir.path());
    (dir, config)
}

#[test]
fn test_values_survive_reopen() {
    let (_dir, config) = scratch();
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f64> = (0..7 * 11).map(|_| rng.gen_range(-1e6..1e6)).collect();

    let mut matrix = Matrix::with_config(7, 11, 0.0f64, config.clone()).unwrap();
    for (index, &value) in values.iter().enumerate() {
        matrix.set_index(index, value);
    }
    matrix.flush().unwrap();
    let path = matrix.path().unwrap().to_path_buf();
    drop(matrix);

    let reopened = Matrix::<f64>::open_with_config(&path, config).unwrap();
    assert_eq!(reopened.shape(), (7, 11));
    assert_eq!(to_vec(&reopened), values);
}

#[test]
fn test_file_layout_on_disk() {
    let (_dir, config) = scratch();
    let mut matrix = Matrix::with_config(2, 3, 0i32, config).unwrap();
    matrix.set(1, 2, 0x0102_0304);
    matrix.flush().unwrap();

    let bytes = std::fs::read(matrix.path().unwrap()).unwrap();
    assert_eq!(bytes.len(), 168 + 2 * 3 * 4 + 16);
    assert_eq!(&bytes[..16], b"::---begin---::\n");
    assert_eq!(&bytes[bytes.len() - 16..], b"::----end----::\n");

    let last_cell = 168 + 5 * 4;
    assert_eq!(
        i32::from_ne_bytes(bytes[last_cell..last_cell + 4].try_into().unwrap()),
        0x0102_0304
    );
}

#[test]
fn test_resize_within_capacity_keeps_file() {
    let (_dir, config) = scratch();
    let mut matrix = Matrix::with_config(6, 6, 1u16, config).unwrap();
    let path = matrix.path().unwrap().to_path_buf();

    for (rows, columns) in [(3, 12), (1, 1), (36, 1), (4, 9)] {
        matrix.resize_with(rows, columns, 2).unwrap();
        assert_eq!(matrix.path().unwrap(), path);
        assert_eq!(matrix.shape(), (rows, columns));
    }

    matrix.resize_with(7, 7, 3).unwrap();
    assert_ne!(matrix.path().unwrap(), path);
    assert!(path.exists(), "old file is left for other handles");
}

#[test]
fn test_shrink_then_grow_fills_exposed_cells() {
    let (_dir, config) = scratch();
    let mut matrix = Matrix::with_config(3, 3, 5u8, config).unwrap();
    matrix.resize_with(1, 2, 0).unwrap();
    matrix.resize_with(2, 2, 8).unwrap();

    assert_eq!(to_vec(&matrix), vec![5, 5, 8, 8]);
}

#[test]
fn test_load_rejects_bad_files() {
    let (dir, config) = scratch();

    let tiny = dir.path().join("tiny.grid");
    std::fs::write(&tiny, [0u8; 100]).unwrap();
    let mut matrix = Matrix::<u32>::unmapped_with_config(config.clone());
    assert!(matches!(
        matrix.load(&tiny),
        Err(Error::Format(GridError::FileTooSmall))
    ));
    assert!(!matrix.is_valid());

    // declared dims exceed the file: patch rows in a valid file
    let source = Matrix::with_config(2, 2, 0u32, config.clone()).unwrap();
    let mut bytes = std::fs::read(source.path().unwrap()).unwrap();
    bytes[24..32].copy_from_slice(&1000u64.to_ne_bytes());
    let truncated = dir.path().join("truncated.grid");
    std::fs::write(&truncated, &bytes).unwrap();

    let mut matrix = Matrix::with_config(1, 1, 0u32, config).unwrap();
    assert!(matches!(
        matrix.load(&truncated),
        Err(Error::Format(GridError::SizeMismatch))
    ));
    assert!(!matrix.is_valid());
    assert_eq!(matrix.shape(), (0, 0));

    assert!(matches!(
        Matrix::<u32>::open(dir.path().join("missing.grid")),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_load_accepts_oversized_file() {
    let (dir, config) = scratch();
    let source = Matrix::with_config(2, 2, 4i64, config.clone()).unwrap();
    let mut bytes = std::fs::read(source.path().unwrap()).unwrap();
    bytes[24..32].copy_from_slice(&1u64.to_ne_bytes());
    let path = dir.path().join("roomy.grid");
    std::fs::write(&path, &bytes).unwrap();

    let matrix = Matrix::<i64>::open_with_config(&path, config).unwrap();
    assert_eq!(matrix.shape(), (1, 2));
    assert_eq!(matrix.capacity(), 4);
}

#[test]
fn test_element_size_checked_on_open() {
    let (_dir, config) = scratch();
    let matrix = Matrix::with_config(2, 2, 0u64, config).unwrap();
    assert!(matches!(
        Matrix::<u16>::open(matrix.path().unwrap()),
        Err(Error::Format(GridError::ElementSizeMismatch))
    ));
}

#[test]
fn test_cube_resize_and_copy() {
    let (_dir, config) = scratch();
    let mut cube = Matrix3d::with_config(2, 2, 2, 1.0f32, config).unwrap();
    cube.set(1, 1, 1, 8.0);

    let copy = cube.deep_copy().unwrap();
    cube.resize_with(1, 2, 2, 0.0).unwrap();
    assert_eq!(cube.shape(), (1, 2, 2));
    assert_eq!(copy.shape(), (2, 2, 2));
    assert_eq!(copy.at(1, 1, 1), 8.0);
}

//! Create a persistent grid, grow it, share it and reopen it.
//!
//! Run with: cargo run --example persistent_matrix

use mmgrid::{Expression, ExpressionMut, GridFile, Labeled, LockStatus, Matrix, StorageConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = StorageConfig::from_env().with_prefix("demo-");
    let mut matrix = Matrix::with_config(4, 4, 0.0f64, config)?;
    matrix.set_column_header(0, "time");
    println!("created {:?}", matrix);

    for row in 0..4 {
        matrix.set(row, 0, row as f64 * 0.5);
    }

    // shrink and regrow inside the original capacity: same file
    let original = matrix.path().map(|p| p.to_path_buf());
    matrix.resize_with(2, 8, -1.0)?;
    assert_eq!(matrix.path().map(|p| p.to_path_buf()), original);

    // a second handle on the same file, coordinated by the embedded mutex
    let mut other = matrix.try_clone()?;
    if other.lock()? == LockStatus::OwnerDied {
        other.mark_consistent()?;
    }
    other.set(1, 7, 42.0);
    other.unlock()?;
    println!("value written by the other handle: {}", matrix.at(1, 7));

    // growing past capacity moves to a new file
    matrix.resize_with(10, 10, 1.0)?;
    println!("grew into {}", matrix.path().unwrap_or(std::path::Path::new("?")).display());

    let info = GridFile::inspect(matrix.path().ok_or("unmapped")?)?;
    println!(
        "{} x {} grid of {}-byte cells, {} bytes on disk",
        info.dims.rows, info.dims.columns, info.element_size, info.file_size
    );
    println!("column 0 is labelled {:?}", matrix.column_header(0));

    other.remove()?;
    matrix.remove()?;
    Ok(())
}

//! Compose zero-copy views over an in-memory grid and materialise the result.
//!
//! Run with: cargo run --example view_composition

use mmgrid::views::{augment_rows, BorderMode, SortOrder, ViewExt};
use mmgrid::{evaluate, Array, Expression, ExpressionMut, Shared};

fn print<E>(title: &str, grid: &E)
where
    E: Expression,
    E::Elem: std::fmt::Display,
{
    println!("{title} ({} x {}):", grid.rows(), grid.columns());
    for row in 0..grid.rows() {
        let cells: Vec<String> = (0..grid.columns())
            .map(|column| format!("{:>4}", grid.at(row, column)))
            .collect();
        println!("  {}", cells.join(""));
    }
}

fn main() -> mmgrid::Result<()> {
    let grid = Shared::new(Array::from_fn(4, 5, |r, c| (r * 5 + c) as i32));
    print("source", &grid);

    print("roi (1,1)-(2,3)", &grid.clone().roi(1, 1, 2, 3));
    print("transposed", &grid.clone().transpose());
    print(
        "repeat border",
        &grid.clone().border(1, 1, 1, 1, BorderMode::Repeat),
    );
    print(
        "columns sorted by row 0, descending",
        &grid.clone().sort_columns_by_row(0, SortOrder::Descending),
    );
    print("stacked on its reverse", &augment_rows(grid.clone(), grid.clone().reverse_rows()));

    // writes through a view land in the shared grid
    let mut diagonal_corner = grid.clone().roi(3, 4, 2, 3);
    diagonal_corner.set(0, 0, -99);
    print("after writing through a mirrored roi", &grid);

    let mut snapshot = Array::new(0, 0, 0);
    evaluate(&grid.clone().shuffle_rows(2024), &mut snapshot)?;
    print("materialised shuffle", &snapshot);
    Ok(())
}

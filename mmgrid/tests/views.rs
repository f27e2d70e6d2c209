use mmgrid::views::{
    augment_columns, border, roi, select_rows, shuffle_columns, sort_rows_by_column, transpose,
    BorderMode, SortOrder, ViewExt,
};
use mmgrid::{
    evaluate, to_vec, Array, Expression, ExpressionMut, Matrix, Shared, SharedConst,
    StorageConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

fn counting(rows: usize, columns: usize) -> Array<i32> {
    Array::from_fn(rows, columns, |r, c| (r * columns + c) as i32)
}

#[test]
fn test_roi_over_counting_grid() {
    let src = counting(5, 5);
    let view = roi(&src, 1, 1, 3, 3);
    assert_eq!(view.shape(), (3, 3));
    assert_eq!(view.at(0, 0), src.at(1, 1));
    assert_eq!(to_vec(&view), vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
}

#[test]
fn test_transpose_random_shapes() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let rows = rng.gen_range(1..9);
        let columns = rng.gen_range(1..9);
        let src = Array::from_fn(rows, columns, |_, _| rng.gen::<i16>());
        let t = transpose(&src);
        assert_eq!(t.rows(), src.columns());
        assert_eq!(t.columns(), src.rows());
        for i in 0..t.rows() {
            for j in 0..t.columns() {
                assert_eq!(t.at(i, j), src.at(j, i));
            }
        }
    }
}

#[test]
fn test_augment_columns_property() {
    let a = counting(4, 2);
    let b = Array::from_fn(2, 3, |r, c| -((r * 3 + c) as i32) - 1);
    let view = augment_columns(&a, &b);
    assert_eq!(view.shape(), (4, 5));

    for row in 0..4 {
        for column in 0..5 {
            let expected = match (row, column) {
                (r, c) if c < 2 => a.at(r, c),
                (r, c) if r < 2 => b.at(r, c - 2),
                _ => 0,
            };
            assert_eq!(view.at(row, column), expected);
        }
    }
}

#[test]
fn test_circular_period_on_views() {
    let src = counting(3, 4);
    let view = (&src).roi(0, 1, 2, 3).reverse_rows().border(1, 0, 0, 1, BorderMode::Repeat);
    let size = view.size() as isize;
    for k in -30..30 {
        for n in [-3isize, -1, 1, 2] {
            assert_eq!(view.circ_at_index(k), view.circ_at_index(k + n * size));
        }
    }
}

#[test]
fn test_views_over_persistent_matrix() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::with_scratch_dir(dir.path());
    let matrix = Shared::new(Matrix::with_config(4, 6, 0.0f64, config).unwrap());

    let mut region = matrix.clone().roi(1, 1, 2, 4).transpose();
    assert_eq!(region.shape(), (4, 2));
    region.set(3, 1, 1.5);
    assert_eq!(matrix.at(2, 4), 1.5);

    // resizing the leaf is visible through the view at once
    matrix.borrow_mut().unwrap().resize_with(2, 2, 0.0).unwrap();
    assert_eq!(region.shape(), (4, 2));
    assert_eq!(region.at(0, 0), matrix.circ_at(1, 1));
}

#[test]
fn test_evaluate_view_into_new_leaf() {
    let src = counting(3, 3);
    let sorted = sort_rows_by_column(&src, 0, SortOrder::Descending);
    let mut out = Array::new(0, 0, 0);
    evaluate(&sorted, &mut out).unwrap();
    assert_eq!(out.as_slice(), &[6, 7, 8, 3, 4, 5, 0, 1, 2]);
}

#[test]
fn test_read_only_handle_still_composes() {
    let grid: SharedConst<Array<i32>> = Shared::new(counting(3, 3)).into();
    let view = select_rows(grid.clone(), vec![2, 2]);
    assert_eq!(to_vec(&view), vec![6, 7, 8, 6, 7, 8]);

    let shuffled = shuffle_columns(grid, 11);
    let mut row: Vec<i32> = (0..3).map(|c| shuffled.at(0, c)).collect();
    row.sort();
    assert_eq!(row, vec![0, 1, 2]);
}

#[test]
fn test_padding_black_hole_on_shared() {
    let grid = Shared::new(Array::new(2, 2, 1u8));
    let mut padded = border(grid.clone(), 1, 1, 1, 1, BorderMode::Constant(0));
    for row in 0..4 {
        for column in 0..4 {
            padded.set(row, column, 7);
        }
    }
    assert_eq!(to_vec(&grid), vec![7, 7, 7, 7]);
    assert_eq!(padded.at(0, 0), 0);
}

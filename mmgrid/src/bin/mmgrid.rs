use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use mmgrid::views::{roi, transpose};
use mmgrid::{
    Expression, ExpressionMut, GridElement, GridFile, GridKind, LockStatus, Matrix, StorageConfig,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "mmgrid CLI - create, inspect and edit memory-mapped grid files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new 2-D grid file and print its path
    Create {
        rows: usize,

        columns: usize,

        /// Initial value of every cell
        #[arg(long, default_value = "0")]
        fill: String,

        #[arg(long, value_enum, default_value_t = ElementKind::F64)]
        r#type: ElementKind,

        /// Directory for the new file (defaults to MMGRID_SCRATCH_DIR or the temp dir)
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show header information
    Info {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print cells of a 2-D grid
    Show {
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = ElementKind::F64)]
        r#type: ElementKind,

        /// Region to print (format: row1,col1,row2,col2)
        #[arg(long)]
        roi: Option<String>,

        /// Print the transpose
        #[arg(long)]
        transpose: bool,
    },
    /// Write one cell while holding the file's mutex
    Set {
        path: PathBuf,

        row: usize,

        column: usize,

        value: String,

        #[arg(long, value_enum, default_value_t = ElementKind::F64)]
        r#type: ElementKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ElementKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Run `$body` with `$t` bound to the element type selected by `$kind`
macro_rules! with_element {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ElementKind::U8 => { type $t = u8; $body }
            ElementKind::I8 => { type $t = i8; $body }
            ElementKind::U16 => { type $t = u16; $body }
            ElementKind::I16 => { type $t = i16; $body }
            ElementKind::U32 => { type $t = u32; $body }
            ElementKind::I32 => { type $t = i32; $body }
            ElementKind::U64 => { type $t = u64; $body }
            ElementKind::I64 => { type $t = i64; $body }
            ElementKind::F32 => { type $t = f32; $body }
            ElementKind::F64 => { type $t = f64; $body }
        }
    };
}

fn main() -> CliResult<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("MMGRID_LOG", "warn"))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Create {
            rows,
            columns,
            fill,
            r#type,
            scratch_dir,
            prefix,
        } => {
            let mut config = match scratch_dir {
                Some(dir) => StorageConfig::with_scratch_dir(dir),
                None => StorageConfig::from_env(),
            };
            if let Some(prefix) = prefix {
                config = config.with_prefix(prefix);
            }
            let path = with_element!(r#type, T => create::<T>(rows, columns, &fill, config)?);
            println!("{}", path.display());
        }
        Commands::Info { path, json } => {
            let info = GridFile::inspect(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_info(&info);
            }
        }
        Commands::Show {
            path,
            r#type,
            roi,
            transpose,
        } => {
            let region = roi.as_deref().map(parse_roi).transpose()?;
            with_element!(r#type, T => show::<T>(&path, region, transpose)?);
        }
        Commands::Set {
            path,
            row,
            column,
            value,
            r#type,
        } => {
            with_element!(r#type, T => set::<T>(&path, row, column, &value)?);
        }
    }
    Ok(())
}

fn parse_value<T>(text: &str) -> CliResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim()
        .parse()
        .map_err(|e: T::Err| format!("invalid value '{text}': {e}").into())
}

fn parse_roi(text: &str) -> CliResult<[isize; 4]> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<isize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid roi '{text}': {e}"))?;
    match parts[..] {
        [r1, c1, r2, c2] => Ok([r1, c1, r2, c2]),
        _ => Err(format!("roi '{text}' needs four values: row1,col1,row2,col2").into()),
    }
}

fn create<T>(rows: usize, columns: usize, fill: &str, config: StorageConfig) -> CliResult<PathBuf>
where
    T: GridElement + FromStr,
    T::Err: Display,
{
    let fill: T = parse_value(fill)?;
    let matrix = Matrix::with_config(rows, columns, fill, config)?;
    matrix.flush()?;
    let path = matrix.path().ok_or("grid has no backing file")?.to_path_buf();
    Ok(path)
}

fn print_info(info: &GridFile) {
    let kind = match info.kind {
        GridKind::Matrix => "matrix",
        GridKind::Matrix3d => "matrix3d",
    };
    println!("path:         {}", info.path.display());
    println!("kind:         {kind}");
    println!("element size: {} bytes", info.element_size);
    match info.kind {
        GridKind::Matrix => println!("dims:         {} x {}", info.dims.rows, info.dims.columns),
        GridKind::Matrix3d => println!(
            "dims:         {} x {} x {}",
            info.dims.pages, info.dims.rows, info.dims.columns
        ),
    }
    println!("file size:    {} bytes", info.file_size);
    println!("capacity:     {} cells", info.capacity);
    println!("footer:       {}", if info.footer_valid { "ok" } else { "missing" });
}

fn show<T>(path: &Path, region: Option<[isize; 4]>, transposed: bool) -> CliResult<()>
where
    T: GridElement + Display,
{
    let matrix = Matrix::<T>::open(path)?;
    if matrix.is_empty() {
        println!("(empty {} x {} grid)", matrix.rows(), matrix.columns());
        return Ok(());
    }

    let [r1, c1, r2, c2] = region.unwrap_or([
        0,
        0,
        matrix.rows() as isize - 1,
        matrix.columns() as isize - 1,
    ]);
    let view = roi(&matrix, r1, c1, r2, c2);
    if transposed {
        print_grid(&transpose(view));
    } else {
        print_grid(&view);
    }
    Ok(())
}

fn print_grid<E>(grid: &E)
where
    E: Expression,
    E::Elem: Display,
{
    for row in 0..grid.rows() {
        let line = (0..grid.columns())
            .map(|column| grid.at(row, column).to_string())
            .collect::<Vec<_>>()
            .join("\t");
        println!("{line}");
    }
}

fn set<T>(path: &Path, row: usize, column: usize, value: &str) -> CliResult<()>
where
    T: GridElement + FromStr,
    T::Err: Display,
{
    let value: T = parse_value(value)?;
    let mut matrix = Matrix::<T>::open(path)?;
    if row >= matrix.rows() || column >= matrix.columns() {
        return Err(format!(
            "cell ({row}, {column}) is outside the {} x {} grid",
            matrix.rows(),
            matrix.columns()
        )
        .into());
    }

    if matrix.lock()? == LockStatus::OwnerDied {
        log::warn!("previous lock holder died; marking {} consistent", path.display());
        matrix.mark_consistent()?;
    }
    matrix.set(row, column, value);
    let flushed = matrix.flush();
    matrix.unlock()?;
    flushed?;
    Ok(())
}

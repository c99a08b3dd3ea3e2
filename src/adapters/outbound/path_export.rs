use crate::common::ApplicationResult;
use crate::domains::navigation::grid::Position;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct PathRow {
    row: usize,
    col: usize,
}

/// Write `path` as CSV with a `row,col` header.
pub fn write_path<W: Write>(writer: W, path: &[Position]) -> ApplicationResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    if path.is_empty() {
        out.write_record(["row", "col"])?;
    }
    for position in path {
        out.serialize(PathRow {
            row: position.row,
            col: position.col,
        })?;
    }
    out.flush()?;
    Ok(())
}

/// Export `path` to a CSV file, creating parent directories as needed.
pub fn export_path<P: AsRef<Path>>(path: &[Position], file: P) -> ApplicationResult<()> {
    let file = file.as_ref();
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_path(std::fs::File::create(file)?, path)
}

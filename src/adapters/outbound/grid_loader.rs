use crate::common::{GridError, GridResult};
use crate::domains::navigation::grid::{Cell, Grid};
use crate::domains::navigation::ports::{GridSource, LoadedGrid};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const MAP_DIR_ENV: &str = "NAVIGATOR_MAP_DIR";
const DEFAULT_MAP_DIR: &str = "resources/maps";

/// Parse a whitespace-separated label map: one row per line, blank lines skipped.
pub fn parse_grid(text: &str) -> GridResult<LoadedGrid> {
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row_index = rows.len();
        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                let label: i64 = token.parse().map_err(|_| GridError::InvalidToken {
                    line: line_no + 1,
                    token: token.to_string(),
                })?;
                Cell::from_label(label).ok_or(GridError::UnknownLabel {
                    label,
                    row: row_index,
                    col,
                })
            })
            .collect::<GridResult<Vec<_>>>()?;
        rows.push(row);
    }

    let grid = Grid::from_rows(rows)?;
    let (start, goal) = grid.endpoints()?;
    Ok(LoadedGrid { grid, start, goal })
}

/// Read and parse a map file.
pub fn load_grid<P: AsRef<Path>>(path: P) -> GridResult<LoadedGrid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GridError::NotFound {
            path: path.display().to_string(),
        },
        _ => GridError::Io(e),
    })?;
    parse_grid(&text)
}

/// Map source reading label files below a base directory.
pub struct FilesystemGridSource {
    base: PathBuf,
}

impl FilesystemGridSource {
    /// `base` defaults to `NAVIGATOR_MAP_DIR`, then `./resources/maps`.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            env::var(MAP_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MAP_DIR))
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Absolute names and paths that already exist are used as given.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let candidate = Path::new(name);
        if candidate.is_absolute() || candidate.exists() {
            candidate.to_path_buf()
        } else {
            self.base.join(candidate)
        }
    }
}

impl GridSource for FilesystemGridSource {
    fn load_grid(&self, name: &str) -> GridResult<LoadedGrid> {
        load_grid(self.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::navigation::grid::Position;

    #[test]
    fn test_parse_skips_blank_lines() {
        let loaded = parse_grid("2 0 0\n\n0 1 3\n").unwrap();
        assert_eq!(loaded.grid.rows(), 2);
        assert_eq!(loaded.start, Position::new(0, 0));
        assert_eq!(loaded.goal, Position::new(1, 2));
    }

    #[test]
    fn test_parse_reports_bad_token_line() {
        match parse_grid("2 0\n0 x\n3 0") {
            Err(GridError::InvalidToken { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("Expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_requires_goal() {
        assert!(matches!(parse_grid("2 0\n0 0"), Err(GridError::MissingGoal)));
        assert!(matches!(parse_grid("3 0\n0 0"), Err(GridError::MissingStart)));
        assert!(matches!(parse_grid("\n \n"), Err(GridError::Empty)));
    }

    #[test]
    fn test_resolve_relative_to_base() {
        let source = FilesystemGridSource::new(Some(PathBuf::from("/maps")));
        assert_eq!(source.resolve("no_such_map.txt"), PathBuf::from("/maps/no_such_map.txt"));
        assert_eq!(source.resolve("/tmp/b.txt"), PathBuf::from("/tmp/b.txt"));
    }
}

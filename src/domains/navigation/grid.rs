use crate::common::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Occupancy label of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Free,
    Obstacle,
    Start,
    Goal,
}

impl Cell {
    /// Integer label used by map files: 0 free, 1 obstacle, 2 start, 3 goal.
    pub fn label(self) -> u8 {
        match self {
            Cell::Free => 0,
            Cell::Obstacle => 1,
            Cell::Start => 2,
            Cell::Goal => 3,
        }
    }

    pub fn from_label(label: i64) -> Option<Cell> {
        match label {
            0 => Some(Cell::Free),
            1 => Some(Cell::Obstacle),
            2 => Some(Cell::Start),
            3 => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn is_obstacle(self) -> bool {
        self == Cell::Obstacle
    }
}

/// Offsets of the 8-connected neighbourhood, in the order every search
/// enumerates them: up, down, left, right, then the four diagonals.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dr = self.row.abs_diff(other.row) as u64;
        let dc = self.col.abs_diff(other.col) as u64;
        ((dr * dr + dc * dc) as f64).sqrt()
    }

    /// True when `other` is one of the 8 cells surrounding `self`.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }

    /// In-bounds 8-connected neighbours paired with a flag marking diagonal moves.
    pub fn neighbors_8(self, rows: usize, cols: usize) -> impl Iterator<Item = (Position, bool)> {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = self.row.checked_add_signed(dr)?;
            let col = self.col.checked_add_signed(dc)?;
            (row < rows && col < cols).then(|| (Position::new(row, col), dr != 0 && dc != 0))
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular occupancy grid stored row-major.
///
/// A grid is never edited in place once built; operations such as inflation
/// return a new grid. Deserialization checks the cell count against the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> GridResult<Self> {
        if raw.rows == 0 || raw.cols == 0 {
            return Err(GridError::Empty);
        }
        if raw.cells.len() != raw.rows * raw.cols {
            return Err(GridError::CellCount {
                rows: raw.rows,
                cols: raw.cols,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
        })
    }
}

impl Grid {
    /// Build a grid from rows of cells. Rejects empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> GridResult<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(GridError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        let row_count = rows.len();
        Ok(Self {
            rows: row_count,
            cols: expected,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a grid from integer labels, the representation map files use.
    pub fn from_labels(labels: &[Vec<i64>]) -> GridResult<Self> {
        let rows = labels
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.iter()
                    .enumerate()
                    .map(|(col, &label)| {
                        Cell::from_label(label).ok_or(GridError::UnknownLabel { label, row, col })
                    })
                    .collect::<GridResult<Vec<_>>>()
            })
            .collect::<GridResult<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// A grid of the given size with every cell set to `cell`.
    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    /// Copy of this grid with one cell relabelled.
    pub fn with_cell(mut self, position: Position, cell: Cell) -> Self {
        self.set(position, cell);
        self
    }

    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        let index = self.index_of(position);
        self.cells[index] = cell;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    pub fn get(&self, position: Position) -> Option<Cell> {
        self.contains(position)
            .then(|| self.cells[self.index_of(position)])
    }

    pub fn is_obstacle(&self, position: Position) -> bool {
        self.get(position).is_some_and(Cell::is_obstacle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Position::new(i / cols, i % cols), cell))
    }

    pub fn positions_of(&self, cell: Cell) -> Vec<Position> {
        self.iter()
            .filter(|&(_, c)| c == cell)
            .map(|(position, _)| position)
            .collect()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle()).count()
    }

    /// Locate the single Start and single Goal cell.
    pub fn endpoints(&self) -> GridResult<(Position, Position)> {
        let start = self.unique(Cell::Start, "start")?.ok_or(GridError::MissingStart)?;
        let goal = self.unique(Cell::Goal, "goal")?.ok_or(GridError::MissingGoal)?;
        Ok((start, goal))
    }

    fn unique(&self, cell: Cell, label: &'static str) -> GridResult<Option<Position>> {
        let found = self.positions_of(cell);
        match found.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            [first, second, ..] => Err(GridError::DuplicateEndpoint {
                label,
                first_row: first.row,
                first_col: first.col,
                second_row: second.row,
                second_col: second.col,
            }),
        }
    }

    /// Integer labels row by row.
    pub fn to_labels(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|c| c.label()).collect())
            .collect()
    }

    fn index_of(&self, position: Position) -> usize {
        position.row * self.cols + position.col
    }
}

impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, position: Position) -> &Cell {
        assert!(self.contains(position), "position {} outside grid", position);
        &self.cells[self.index_of(position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels_rejects_ragged_rows() {
        let result = Grid::from_labels(&[vec![0, 0, 0], vec![0, 0]]);
        match result {
            Err(GridError::RaggedRow { row, expected, found }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("Expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_from_labels_rejects_unknown_label() {
        let result = Grid::from_labels(&[vec![0, 7]]);
        assert!(matches!(
            result,
            Err(GridError::UnknownLabel { label: 7, row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_endpoints_found_once() {
        let grid = Grid::from_labels(&[vec![2, 0], vec![1, 3]]).unwrap();
        let (start, goal) = grid.endpoints().unwrap();
        assert_eq!(start, Position::new(0, 0));
        assert_eq!(goal, Position::new(1, 1));
        assert_eq!(grid.obstacle_count(), 1);
    }

    #[test]
    fn test_duplicate_start_is_rejected() {
        let grid = Grid::from_labels(&[vec![2, 2], vec![0, 3]]).unwrap();
        assert!(matches!(
            grid.endpoints(),
            Err(GridError::DuplicateEndpoint { label: "start", .. })
        ));
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let corner: Vec<_> = Position::new(0, 0).neighbors_8(3, 3).collect();
        assert_eq!(
            corner,
            vec![
                (Position::new(1, 0), false),
                (Position::new(0, 1), false),
                (Position::new(1, 1), true),
            ]
        );
    }

    #[test]
    fn test_deserialize_rejects_wrong_cell_count() {
        let short = r#"{"rows":2,"cols":2,"cells":["Start","Free","Goal"]}"#;
        match serde_json::from_str::<Grid>(short) {
            Err(e) => assert!(e.to_string().contains("2 x 2"), "unexpected error: {}", e),
            Ok(grid) => panic!("Expected an error, got {:?}", grid),
        }
        assert!(serde_json::from_str::<Grid>(r#"{"rows":0,"cols":3,"cells":[]}"#).is_err());

        let grid = Grid::from_labels(&[vec![2, 1], vec![0, 3]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
    }

    #[test]
    fn test_labels_roundtrip_shape() {
        let grid = Grid::from_labels(&[vec![2, 0, 1], vec![0, 0, 3]]).unwrap();
        assert_eq!(grid.to_labels(), vec![vec![2, 0, 1], vec![0, 0, 3]]);
        assert_eq!(grid[Position::new(0, 2)], Cell::Obstacle);
    }
}

use super::grid::{Cell, Grid, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rectangular robot footprint in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprint {
    pub width: usize,
    pub height: usize,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 2,
            height: 2,
        }
    }
}

impl Footprint {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Inflation radii as (rows, cols).
    pub fn radii(&self) -> (usize, usize) {
        inflation_radii(self.width, self.height)
    }

    pub fn inflate(&self, grid: &Grid) -> Grid {
        inflate(grid, self.width, self.height)
    }

    pub fn collides(&self, grid: &Grid, position: Position) -> bool {
        check_collision(grid, position, self.width, self.height)
    }
}

fn inflation_radii(robot_width: usize, robot_height: usize) -> (usize, usize) {
    (
        robot_height.saturating_sub(1) / 2,
        robot_width.saturating_sub(1) / 2,
    )
}

/// Grow every obstacle by the robot footprint so the robot can be planned as a point.
///
/// Obstacle seeds come from the input grid only, so inflated cells never seed
/// further growth. Only cells labelled exactly `Free` are converted; Start and
/// Goal keep their labels. The input grid is left untouched.
pub fn inflate(grid: &Grid, robot_width: usize, robot_height: usize) -> Grid {
    let (radius_rows, radius_cols) = inflation_radii(robot_width, robot_height);
    let mut inflated = grid.clone();
    if radius_rows == 0 && radius_cols == 0 {
        return inflated;
    }

    let obstacles = grid.positions_of(Cell::Obstacle);
    for obstacle in &obstacles {
        let row_lo = obstacle.row.saturating_sub(radius_rows);
        let row_hi = (obstacle.row + radius_rows).min(grid.rows() - 1);
        let col_lo = obstacle.col.saturating_sub(radius_cols);
        let col_hi = (obstacle.col + radius_cols).min(grid.cols() - 1);

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let position = Position::new(row, col);
                if inflated[position] == Cell::Free {
                    inflated.set(position, Cell::Obstacle);
                }
            }
        }
    }

    debug!(
        seeds = obstacles.len(),
        radius_rows,
        radius_cols,
        inflated = inflated.obstacle_count(),
        "inflated obstacles"
    );
    inflated
}

/// Whether a robot centred at `position` overlaps an obstacle or leaves the grid.
///
/// The checked rectangle spans `height / 2` rows and `width / 2` columns on
/// each side of the centre.
pub fn check_collision(grid: &Grid, position: Position, width: usize, height: usize) -> bool {
    let half_h = (height / 2) as isize;
    let half_w = (width / 2) as isize;
    let (row, col) = (position.row as isize, position.col as isize);

    for dr in -half_h..=half_h {
        for dc in -half_w..=half_w {
            let (r, c) = (row + dr, col + dc);
            // Out of bounds counts as a collision
            if r < 0 || c < 0 {
                return true;
            }
            match grid.get(Position::new(r as usize, c as usize)) {
                None | Some(Cell::Obstacle) => return true,
                Some(_) => {}
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_obstacle() -> Grid {
        Grid::from_labels(&[
            vec![2, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 3],
        ])
        .unwrap()
    }

    #[test]
    fn test_radii_floor_division() {
        assert_eq!(Footprint::new(1, 1).radii(), (0, 0));
        assert_eq!(Footprint::new(2, 2).radii(), (0, 0));
        assert_eq!(Footprint::new(3, 5).radii(), (2, 1));
        assert_eq!(Footprint::new(0, 0).radii(), (0, 0));
    }

    #[test]
    fn test_three_by_three_grows_square() {
        let grid = single_obstacle();
        let inflated = inflate(&grid, 3, 3);
        assert_eq!(inflated.obstacle_count(), 9);
        for row in 1..=3 {
            for col in 1..=3 {
                assert!(inflated.is_obstacle(Position::new(row, col)));
            }
        }
        // input untouched
        assert_eq!(grid.obstacle_count(), 1);
    }

    #[test]
    fn test_inflation_does_not_chain() {
        let grid = single_obstacle();
        let inflated = inflate(&grid, 5, 1);
        // radius_cols = 2, radius_rows = 0: one horizontal band only
        assert_eq!(inflated.obstacle_count(), 5);
        assert!(!inflated.is_obstacle(Position::new(1, 2)));
    }

    #[test]
    fn test_endpoints_survive_inflation() {
        let grid = Grid::from_labels(&[vec![2, 1, 3]]).unwrap();
        let inflated = inflate(&grid, 3, 3);
        assert_eq!(inflated, grid);
    }

    #[test]
    fn test_collision_rectangle() {
        let grid = single_obstacle();
        assert!(check_collision(&grid, Position::new(2, 2), 1, 1));
        assert!(!check_collision(&grid, Position::new(0, 4), 1, 1));
        assert!(check_collision(&grid, Position::new(1, 1), 3, 3));
        // footprint spills past the top edge
        assert!(check_collision(&grid, Position::new(0, 4), 3, 3));
        assert!(!Footprint::new(1, 3).collides(&grid, Position::new(2, 0)));
        assert!(Footprint::new(3, 1).collides(&grid, Position::new(2, 1)));
    }
}

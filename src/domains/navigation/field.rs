//! Artificial potential field over an occupancy grid.
//!
//! Every free cell gets `U_att + U_rep`: a linear pull towards the goal and a
//! push away from the nearest obstacle that fades out at `obstacle_influence`.
//! Obstacle cells are `+inf` and therefore impassable.

use super::grid::{Cell, Grid, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gains and influence radius of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Strength of goal attraction.
    pub attractive_gain: f64,
    /// Strength of obstacle repulsion.
    pub repulsive_gain: f64,
    /// Distance in cells beyond which obstacles stop repelling.
    pub obstacle_influence: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            attractive_gain: 1.0,
            repulsive_gain: 50.0,
            obstacle_influence: 3.0,
        }
    }
}

impl FieldParams {
    pub fn attractive(&self, distance_to_goal: f64) -> f64 {
        self.attractive_gain * distance_to_goal
    }

    /// Repulsive term for a cell whose nearest obstacle is `distance` away.
    /// Zero outside the influence radius, including when there is no obstacle.
    pub fn repulsive(&self, distance: f64) -> f64 {
        if distance <= self.obstacle_influence {
            self.repulsive_gain * (1.0 / distance - 1.0 / self.obstacle_influence).powi(2)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotentialField {
    rows: usize,
    cols: usize,
    goal: Position,
    params: FieldParams,
    values: Vec<f64>,
    repulsive: Vec<f64>,
}

impl PotentialField {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    pub fn get(&self, position: Position) -> Option<f64> {
        self.contains(position)
            .then(|| self.values[position.row * self.cols + position.col])
    }

    /// Field value, with out-of-bounds positions treated as impassable.
    pub fn value(&self, position: Position) -> f64 {
        self.get(position).unwrap_or(f64::INFINITY)
    }

    pub fn is_passable(&self, position: Position) -> bool {
        self.value(position).is_finite()
    }

    pub fn attractive_at(&self, position: Position) -> Option<f64> {
        self.get(position)
            .filter(|v| v.is_finite())
            .map(|_| self.params.attractive(position.euclidean_distance(&self.goal)))
    }

    pub fn repulsive_at(&self, position: Position) -> Option<f64> {
        self.contains(position)
            .then(|| self.repulsive[position.row * self.cols + position.col])
            .filter(|v| v.is_finite())
    }

    /// Field values row by row.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }
}

/// Build the potential field of `grid` for `goal`.
pub fn compute_field(grid: &Grid, goal: Position, params: &FieldParams) -> PotentialField {
    let distances = obstacle_distances(grid);
    let mut values = Vec::with_capacity(grid.len());
    let mut repulsive = Vec::with_capacity(grid.len());

    for ((position, cell), nearest) in grid.iter().zip(distances) {
        if cell == Cell::Obstacle {
            values.push(f64::INFINITY);
            repulsive.push(f64::INFINITY);
            continue;
        }
        let u_att = params.attractive(position.euclidean_distance(&goal));
        let u_rep = params.repulsive(nearest);
        values.push(u_att + u_rep);
        repulsive.push(u_rep);
    }

    debug!(
        rows = grid.rows(),
        cols = grid.cols(),
        goal = %goal,
        "computed potential field"
    );

    PotentialField {
        rows: grid.rows(),
        cols: grid.cols(),
        goal,
        params: *params,
        values,
        repulsive,
    }
}

/// Euclidean distance from every cell to its nearest obstacle, row-major.
///
/// `+inf` everywhere when the grid has no obstacles and `0` on obstacle cells.
/// First pass: per column, the vertical distance to the nearest obstacle in
/// that column. Second pass: per row, the minimum of `dc^2 + dv^2` over all
/// columns. Squared distances stay integral, so results equal the brute-force
/// definition exactly.
pub fn obstacle_distances(grid: &Grid) -> Vec<f64> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut vertical: Vec<Option<usize>> = vec![None; rows * cols];

    for col in 0..cols {
        let mut last: Option<usize> = None;
        for row in 0..rows {
            if grid.is_obstacle(Position::new(row, col)) {
                last = Some(row);
            }
            vertical[row * cols + col] = last.map(|r| row - r);
        }
        let mut next: Option<usize> = None;
        for row in (0..rows).rev() {
            if grid.is_obstacle(Position::new(row, col)) {
                next = Some(row);
            }
            if let Some(below) = next.map(|r| r - row) {
                let slot = &mut vertical[row * cols + col];
                *slot = Some(slot.map_or(below, |above| above.min(below)));
            }
        }
    }

    let mut distances = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let line = &vertical[row * cols..(row + 1) * cols];
        for col in 0..cols {
            let best = line
                .iter()
                .enumerate()
                .filter_map(|(c, dv)| {
                    dv.map(|dv| {
                        let dc = c.abs_diff(col) as u64;
                        dc * dc + (dv as u64) * (dv as u64)
                    })
                })
                .min();
            distances.push(best.map_or(f64::INFINITY, |sq| (sq as f64).sqrt()));
        }
    }
    distances
}

/// Brute-force distance from `position` to the nearest obstacle cell.
pub fn nearest_obstacle_distance(grid: &Grid, position: Position) -> f64 {
    grid.iter()
        .filter(|(_, cell)| cell.is_obstacle())
        .map(|(obstacle, _)| position.euclidean_distance(&obstacle))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repulsive_term_fades_at_influence() {
        let params = FieldParams::default();
        assert_eq!(params.repulsive(3.0), 0.0);
        assert_eq!(params.repulsive(3.5), 0.0);
        assert_eq!(params.repulsive(f64::INFINITY), 0.0);
        let expected = 50.0 * (1.0 - 1.0 / 3.0_f64).powi(2);
        assert!((params.repulsive(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_obstacle_cells_are_infinite() {
        let grid = Grid::from_labels(&[vec![2, 1, 0], vec![0, 0, 3]]).unwrap();
        let field = compute_field(&grid, Position::new(1, 2), &FieldParams::default());
        assert_eq!(field.get(Position::new(0, 1)), Some(f64::INFINITY));
        assert!(!field.is_passable(Position::new(0, 1)));
        assert!(field.is_passable(Position::new(0, 0)));
        assert_eq!(field.attractive_at(Position::new(0, 1)), None);
    }

    #[test]
    fn test_value_is_sum_of_components() {
        let grid = Grid::from_labels(&[
            vec![2, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 3],
        ])
        .unwrap();
        let goal = Position::new(2, 3);
        let params = FieldParams::default();
        let field = compute_field(&grid, goal, &params);

        let cell = Position::new(0, 3);
        let d_obs = (1.0_f64 + 4.0).sqrt();
        let expected = params.attractive(2.0) + params.repulsive(d_obs);
        assert!((field.value(cell) - expected).abs() < 1e-12);
        assert_eq!(field.attractive_at(cell), Some(2.0));
        assert_eq!(field.repulsive_at(cell), Some(params.repulsive(d_obs)));
    }

    #[test]
    fn test_distance_transform_matches_brute_force() {
        let grid = Grid::from_labels(&[
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 1, 0],
            vec![0, 0, 0, 0, 0, 0],
            vec![1, 0, 0, 0, 0, 0],
        ])
        .unwrap();
        let fast = obstacle_distances(&grid);
        for (i, (position, _)) in grid.iter().enumerate() {
            assert_eq!(fast[i], nearest_obstacle_distance(&grid, position), "at {}", position);
        }
    }

    #[test]
    fn test_distances_infinite_without_obstacles() {
        let grid = Grid::filled(3, 4, Cell::Free);
        assert!(obstacle_distances(&grid).iter().all(|d| d.is_infinite()));
    }
}

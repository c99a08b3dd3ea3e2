//! Path extraction over a potential field.
//!
//! The primary strategy is a best-first search ordered by `g + field`, where
//! the field value stands in for the heuristic. The field is not a lower bound
//! on the remaining cost, so the search is guided rather than admissible; the
//! statistics built on top of it expect exactly this behaviour. When the search
//! does not reach the goal, a greedy descent over the field is run instead.

use super::field::PotentialField;
use super::grid::Position;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;
use tracing::{debug, warn};

pub const AXIAL_STEP_COST: f64 = 1.0;
pub const DIAGONAL_STEP_COST: f64 = 1.414;

/// Expansion budget of the guided search, per grid cell.
const SEARCH_EXPANSIONS_PER_CELL: usize = 4;
/// Step budget of the descent, per grid cell.
const DESCENT_STEPS_PER_CELL: usize = 2;
const CYCLE_HISTORY_LEN: usize = 20;
const CYCLE_CHECK_AFTER_STEP: usize = 10;
const CYCLE_MAX_REPEATS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    GuidedSearch,
    GradientDescent,
}

/// Why the gradient descent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescentStop {
    ReachedGoal,
    Cycle,
    LocalMinimum,
    StepLimit,
}

impl fmt::Display for DescentStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DescentStop::ReachedGoal => "reached goal",
            DescentStop::Cycle => "detected cycle",
            DescentStop::LocalMinimum => "no valid neighbors",
            DescentStop::StepLimit => "exceeded step limit",
        };
        f.write_str(text)
    }
}

/// Output of [`extract_path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub path: Vec<Position>,
    /// Cells expanded by the guided search.
    pub nodes_explored: usize,
    pub strategy: Strategy,
    /// Set when the descent fallback produced the path.
    pub descent_stop: Option<DescentStop>,
}

impl Extraction {
    pub fn reaches(&self, goal: Position) -> bool {
        self.path.last() == Some(&goal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Empty when the goal was not reached.
    pub path: Vec<Position>,
    pub nodes_explored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub path: Vec<Position>,
    pub stop: DescentStop,
}

/// Frontier entry. Carries the full path taken to reach `position`.
#[derive(Debug, Clone)]
struct SearchNode {
    f: OrderedFloat<f64>,
    g: OrderedFloat<f64>,
    seq: u64,
    position: Position,
    path: Vec<Position>,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour: lowest f, then lowest g, then oldest
        (other.f, other.g, other.seq).cmp(&(self.f, self.g, self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal` over `field`.
///
/// Never fails: if neither strategy reaches the goal the returned path stops
/// short of it, possibly at `start` itself. Callers judge success with
/// [`Extraction::reaches`].
pub fn extract_path(field: &PotentialField, start: Position, goal: Position) -> Extraction {
    let search = guided_search(field, start, goal);

    if search.path.last() == Some(&goal) {
        return Extraction {
            path: search.path,
            nodes_explored: search.nodes_explored,
            strategy: Strategy::GuidedSearch,
            descent_stop: None,
        };
    }

    if search.path.is_empty() {
        warn!(
            start = %start,
            goal = %goal,
            nodes_explored = search.nodes_explored,
            "guided search found no path; obstacles may block every route, falling back to gradient descent"
        );
    } else {
        warn!(
            len = search.path.len(),
            "guided search returned a partial path, falling back to gradient descent"
        );
    }

    let descent = gradient_descent(field, start, goal);
    Extraction {
        path: descent.path,
        nodes_explored: search.nodes_explored,
        strategy: Strategy::GradientDescent,
        descent_stop: Some(descent.stop),
    }
}

/// Best-first search ordered by `f = g + field(cell)`.
///
/// Moves cost 1.0 axially and 1.414 diagonally. Impassable and out-of-bounds
/// neighbours are skipped, and a neighbour is only queued when it improves
/// its best known `g`. Gives up after `4 * rows * cols` pops.
pub fn guided_search(field: &PotentialField, start: Position, goal: Position) -> SearchOutcome {
    let (rows, cols) = (field.rows(), field.cols());
    let max_iterations = SEARCH_EXPANSIONS_PER_CELL * rows * cols;

    let mut open_set = BinaryHeap::new();
    let mut best_g: HashMap<Position, f64> = HashMap::new();
    let mut seq: u64 = 0;

    best_g.insert(start, 0.0);
    open_set.push(SearchNode {
        f: OrderedFloat(field.value(start)),
        g: OrderedFloat(0.0),
        seq,
        position: start,
        path: vec![start],
    });

    let mut iterations = 0;
    let mut nodes_explored = 0;

    while iterations < max_iterations {
        let Some(node) = open_set.pop() else {
            break;
        };
        iterations += 1;

        // Superseded by a cheaper entry for the same cell
        if best_g.get(&node.position).is_some_and(|&g| node.g.0 > g) {
            continue;
        }
        nodes_explored += 1;

        if node.position == goal {
            debug!(
                len = node.path.len(),
                cost = node.g.0,
                nodes_explored,
                "guided search reached goal"
            );
            return SearchOutcome {
                path: node.path,
                nodes_explored,
            };
        }

        for (neighbor, diagonal) in node.position.neighbors_8(rows, cols) {
            let h = field.value(neighbor);
            if h.is_infinite() {
                continue;
            }

            let step = if diagonal { DIAGONAL_STEP_COST } else { AXIAL_STEP_COST };
            let tentative_g = node.g.0 + step;
            if best_g.get(&neighbor).is_some_and(|&known| tentative_g >= known) {
                continue;
            }

            best_g.insert(neighbor, tentative_g);
            let mut path = Vec::with_capacity(node.path.len() + 1);
            path.extend_from_slice(&node.path);
            path.push(neighbor);
            seq += 1;
            open_set.push(SearchNode {
                f: OrderedFloat(tentative_g + h),
                g: OrderedFloat(tentative_g),
                seq,
                position: neighbor,
                path,
            });
        }
    }

    debug!(
        iterations,
        max_iterations,
        nodes_explored,
        exhausted = open_set.is_empty(),
        "guided search did not reach goal"
    );
    SearchOutcome {
        path: Vec::new(),
        nodes_explored,
    }
}

/// Greedy descent: always step to the neighbour with the lowest field value.
///
/// Ties go to the first neighbour in enumeration order. The walk may climb
/// when every neighbour is higher, so it keeps the last 20 cells visited and
/// stops once past step 10 if the next cell already occurs more than twice
/// among them. Also stops when no neighbour is passable or after
/// `2 * rows * cols` steps.
pub fn gradient_descent(field: &PotentialField, start: Position, goal: Position) -> Descent {
    let (rows, cols) = (field.rows(), field.cols());
    let max_steps = DESCENT_STEPS_PER_CELL * rows * cols;

    let mut path = vec![start];
    let mut current = start;
    let mut recent: VecDeque<Position> = VecDeque::with_capacity(CYCLE_HISTORY_LEN);
    recent.push_back(start);

    for step in 0..max_steps {
        if current == goal {
            return Descent {
                path,
                stop: DescentStop::ReachedGoal,
            };
        }

        let mut best: Option<(Position, f64)> = None;
        for (neighbor, _) in current.neighbors_8(rows, cols) {
            let value = field.value(neighbor);
            let lowest = best.map_or(f64::INFINITY, |(_, v)| v);
            if value < lowest {
                best = Some((neighbor, value));
            }
        }

        let Some((next, _)) = best else {
            warn!(at = %current, step, "gradient descent stopped: no valid neighbors");
            return Descent {
                path,
                stop: DescentStop::LocalMinimum,
            };
        };

        if step > CYCLE_CHECK_AFTER_STEP {
            let repeats = recent.iter().filter(|&&p| p == next).count();
            if repeats > CYCLE_MAX_REPEATS {
                warn!(at = %current, next = %next, step, "gradient descent stopped: detected cycle");
                return Descent {
                    path,
                    stop: DescentStop::Cycle,
                };
            }
        }

        path.push(next);
        if recent.len() == CYCLE_HISTORY_LEN {
            recent.pop_front();
        }
        recent.push_back(next);
        current = next;
    }

    if current == goal {
        return Descent {
            path,
            stop: DescentStop::ReachedGoal,
        };
    }
    warn!(max_steps, "gradient descent stopped: exceeded step limit");
    Descent {
        path,
        stop: DescentStop::StepLimit,
    }
}

/// Sum of Euclidean step lengths along `path`.
pub fn path_cost(path: &[Position]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].euclidean_distance(&pair[1]))
        .sum()
}

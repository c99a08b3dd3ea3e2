use crate::common::ApplicationResult;
use crate::domains::logger::DynLogger;
use crate::domains::navigation::{
    compute_field, extract_path, Extraction, FieldParams, Footprint, Grid, GridSource, LoadedGrid,
    PlanningStatistics, Position, PotentialField,
};
use std::sync::Arc;
use tracing::info;

/// Everything one planning run produced.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub start: Position,
    pub goal: Position,
    /// The map as loaded.
    pub map: Grid,
    pub inflated: Grid,
    pub field: PotentialField,
    pub extraction: Extraction,
    pub statistics: PlanningStatistics,
}

impl PlanOutcome {
    pub fn success(&self) -> bool {
        self.statistics.success
    }

    pub fn path(&self) -> &[Position] {
        &self.extraction.path
    }
}

/// Runs the inflate, field, extract pipeline for maps from a [`GridSource`].
pub struct NavigationService {
    grid_source: Arc<dyn GridSource>,
    params: FieldParams,
    logger: DynLogger,
}

impl NavigationService {
    pub fn new(grid_source: Arc<dyn GridSource>, params: FieldParams, logger: DynLogger) -> Self {
        Self {
            grid_source,
            params,
            logger,
        }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn logger(&self) -> &DynLogger {
        &self.logger
    }

    pub fn load_map(&self, name: &str) -> ApplicationResult<LoadedGrid> {
        let loaded = self.grid_source.load_grid(name)?;
        info!(
            map = name,
            rows = loaded.grid.rows(),
            cols = loaded.grid.cols(),
            "loaded map"
        );
        Ok(loaded)
    }

    /// Plan on an already loaded map.
    ///
    /// Statistics describe the map before inflation. Planning time covers
    /// field computation and extraction only. Success means the path ends at
    /// the goal; path length and cost are recorded only then.
    pub fn plan(&self, loaded: &LoadedGrid, footprint: Footprint) -> PlanOutcome {
        let LoadedGrid { grid, start, goal } = loaded;
        let (start, goal) = (*start, *goal);

        let mut statistics = PlanningStatistics::new();
        statistics.set_map_info(grid, footprint.width, footprint.height);
        if footprint.collides(grid, start) {
            self.logger.warn(&format!(
                "Robot footprint at start {} overlaps an obstacle or the map edge",
                start
            ));
        }

        self.logger.info("Inflating obstacles for robot shape...");
        let inflated = footprint.inflate(grid);

        statistics.start_timer();
        self.logger.info("Computing potential field...");
        let field = compute_field(&inflated, goal, &self.params);
        self.logger.info("Extracting path...");
        let extraction = extract_path(&field, start, goal);
        statistics.stop_timer();

        statistics.add_nodes_explored(extraction.nodes_explored);
        if extraction.reaches(goal) {
            statistics.set_success(true, None);
            statistics.set_path_info(&extraction.path);
            self.logger
                .info(&format!("Path found! Length: {} steps", extraction.path.len()));
        } else {
            let reason = match extraction.descent_stop {
                Some(stop) => format!("Path did not reach goal (gradient descent {})", stop),
                None => "Path did not reach goal".to_string(),
            };
            self.logger.warn(&reason);
            statistics.set_success(false, Some(reason));
        }

        PlanOutcome {
            start,
            goal,
            map: grid.clone(),
            inflated,
            field,
            extraction,
            statistics,
        }
    }

    pub fn plan_map(&self, name: &str, footprint: Footprint) -> ApplicationResult<PlanOutcome> {
        let loaded = self.load_map(name)?;
        Ok(self.plan(&loaded, footprint))
    }
}

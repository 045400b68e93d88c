//! Evenly spaced streamline generation.
//!
//! Streamlines are traced through the field with fourth-order Runge-Kutta
//! integration of the normalized velocity, so every step advances roughly
//! `time_step` field units regardless of wind speed. New seeds are taken
//! one separation distance to either side of every accepted streamline; when
//! those run out a regular lattice over the bounding box picks up regions the
//! flow never reached.
//!
//! Generation is incremental: [`StreamlineGenerator::step`] does a bounded
//! amount of work, so a frame loop can interleave generation with drawing.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};
use windmap_common::{BoundingBox, Vector2, VectorField};

/// Velocities shorter than this count as calm and end a streamline.
const STALL_SPEED: f64 = 1e-9;

/// Side seeds sit just beyond `d_sep` so rounding cannot reject them
/// against the streamline they were spawned from.
const SEED_OFFSET_SCALE: f64 = 1.0 + 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),
}

/// Integration and spacing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Minimum distance between a new seed and any existing streamline.
    pub d_sep: f64,
    /// A streamline stops when it comes this close to another one.
    pub d_test: f64,
    /// Integration step length in field units.
    pub time_step: f64,
    /// Seeds traced per call to `step`.
    pub steps_per_iteration: usize,
    /// Integration steps per direction before a streamline is cut off.
    pub max_steps: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            d_sep: 0.5,
            d_test: 0.25,
            time_step: 0.09,
            steps_per_iteration: 4,
            max_steps: 2000,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GeneratorError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )))
            }
        };
        positive("d_sep", self.d_sep)?;
        positive("d_test", self.d_test)?;
        positive("time_step", self.time_step)?;

        if self.d_test > self.d_sep {
            return Err(GeneratorError::InvalidConfig(format!(
                "d_test ({}) must not exceed d_sep ({})",
                self.d_test, self.d_sep
            )));
        }
        if self.steps_per_iteration == 0 {
            return Err(GeneratorError::InvalidConfig(
                "steps_per_iteration must be at least 1".to_string(),
            ));
        }
        if self.max_steps == 0 {
            return Err(GeneratorError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorStatus {
    Running,
    Finished,
}

/// Source of streamlines for the animation.
///
/// Implementations call `on_added` once per completed streamline, in the
/// order they are completed. Every delivered streamline has at least two
/// points.
pub trait StreamlineGenerator {
    /// Perform a bounded slice of work.
    fn step(
        &mut self,
        field: &dyn VectorField,
        on_added: &mut dyn FnMut(Vec<Vector2>),
    ) -> GeneratorStatus;

    /// Step until finished. Returns the number of streamlines delivered.
    fn run_to_completion(
        &mut self,
        field: &dyn VectorField,
        on_added: &mut dyn FnMut(Vec<Vector2>),
    ) -> usize {
        let mut delivered = 0;
        let mut counting = |points: Vec<Vector2>| {
            delivered += 1;
            on_added(points);
        };
        while self.step(field, &mut counting) == GeneratorStatus::Running {}
        delivered
    }
}

/// A point stored in the occupancy grid.
///
/// `position` is the signed integration step along its own streamline
/// (seed = 0, forward positive, backward negative).
#[derive(Debug, Clone, Copy)]
struct GridPoint {
    point: Vector2,
    position: i64,
}

/// Sparse spatial hash with square cells.
#[derive(Debug, Clone)]
struct OccupancyGrid {
    origin: Vector2,
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<GridPoint>>,
}

impl OccupancyGrid {
    fn new(origin: Vector2, cell_size: f64) -> Self {
        Self {
            origin,
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Vector2) -> (i64, i64) {
        (
            ((p.x - self.origin.x) / self.cell_size).floor() as i64,
            ((p.y - self.origin.y) / self.cell_size).floor() as i64,
        )
    }

    fn insert(&mut self, entry: GridPoint) {
        let key = self.cell_of(entry.point);
        self.cells.entry(key).or_default().push(entry);
    }

    fn clear(&mut self) {
        self.cells.clear();
    }

    fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// True if some stored point closer than `radius` to `p` passes `filter`.
    fn any_within<F>(&self, p: Vector2, radius: f64, filter: F) -> bool
    where
        F: Fn(&GridPoint) -> bool,
    {
        let r2 = radius * radius;
        let reach = (radius / self.cell_size).ceil() as i64;
        let (cx, cy) = self.cell_of(p);

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                if cell
                    .iter()
                    .any(|gp| gp.point.distance_squared(&p) < r2 && filter(gp))
                {
                    return true;
                }
            }
        }
        false
    }
}

/// Row-major walk over lattice points spaced `spacing` apart.
#[derive(Debug, Clone)]
struct LatticeSeeds {
    bbox: BoundingBox,
    spacing: f64,
    cols: u64,
    rows: u64,
    next: u64,
}

impl LatticeSeeds {
    fn new(bbox: BoundingBox, spacing: f64) -> Self {
        let cols = (bbox.width / spacing).ceil().max(1.0) as u64;
        let rows = (bbox.height / spacing).ceil().max(1.0) as u64;
        Self {
            bbox,
            spacing,
            cols,
            rows,
            next: 0,
        }
    }
}

impl Iterator for LatticeSeeds {
    type Item = Vector2;

    fn next(&mut self) -> Option<Vector2> {
        if self.next >= self.cols * self.rows {
            return None;
        }
        let col = self.next % self.cols;
        let row = self.next / self.cols;
        self.next += 1;
        Some(Vector2::new(
            self.bbox.left + (col as f64 + 0.5) * self.spacing,
            self.bbox.top + (row as f64 + 0.5) * self.spacing,
        ))
    }
}

/// Jobard-Lefer style generator with an occupancy grid.
#[derive(Debug, Clone)]
pub struct EvenlySpacedGenerator {
    bbox: BoundingBox,
    config: GeneratorConfig,
    occupied: OccupancyGrid,
    own: OccupancyGrid,
    candidates: VecDeque<Vector2>,
    lattice: LatticeSeeds,
    emitted: usize,
    finished: bool,
}

impl EvenlySpacedGenerator {
    pub fn new(bbox: BoundingBox, config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        if !(bbox.width.is_finite() && bbox.height.is_finite() && bbox.width > 0.0 && bbox.height > 0.0)
        {
            return Err(GeneratorError::InvalidConfig(format!(
                "bounding box must have a positive extent, got {}x{}",
                bbox.width, bbox.height
            )));
        }

        let origin = Vector2::new(bbox.left, bbox.top);
        let mut candidates = VecDeque::new();
        candidates.push_back(Vector2::new(
            bbox.left + bbox.width / 2.0,
            bbox.top + bbox.height / 2.0,
        ));

        Ok(Self {
            bbox,
            config,
            occupied: OccupancyGrid::new(origin, config.d_sep),
            own: OccupancyGrid::new(origin, config.d_sep),
            candidates,
            lattice: LatticeSeeds::new(bbox, config.d_sep),
            emitted: 0,
            finished: false,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Streamlines delivered so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_seed(&mut self) -> Option<Vector2> {
        self.candidates.pop_front().or_else(|| self.lattice.next())
    }

    fn is_valid_seed(&self, field: &dyn VectorField, seed: Vector2) -> bool {
        self.bbox.contains(&seed)
            && !self.occupied.any_within(seed, self.config.d_sep, |_| true)
            && self.direction(field, seed, 1.0).is_some()
    }

    /// Unit velocity at `p`, flipped when `sign` is negative.
    fn direction(&self, field: &dyn VectorField, p: Vector2, sign: f64) -> Option<Vector2> {
        let v = field.sample(p)?;
        let speed = v.length();
        if !speed.is_finite() || speed < STALL_SPEED {
            return None;
        }
        Some(v * (sign / speed))
    }

    fn rk4(&self, field: &dyn VectorField, p: Vector2, sign: f64) -> Option<Vector2> {
        let h = self.config.time_step;
        let k1 = self.direction(field, p, sign)?;
        let k2 = self.direction(field, p + k1 * (h / 2.0), sign)?;
        let k3 = self.direction(field, p + k2 * (h / 2.0), sign)?;
        let k4 = self.direction(field, p + k3 * h, sign)?;
        Some(p + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
    }

    /// Integrate from `seed` in one direction, returning the new points.
    fn integrate(&mut self, field: &dyn VectorField, seed: Vector2, sign: f64) -> Vec<Vector2> {
        let h = self.config.time_step;
        let d_test = self.config.d_test;
        // Own points closer than this many steps are neighbours, not a loop.
        let window = (d_test / h).ceil() as i64 + 1;
        let min_advance = (h * 1e-3) * (h * 1e-3);

        let mut points = Vec::new();
        let mut current = seed;
        for k in 1..=self.config.max_steps {
            let Some(next) = self.rk4(field, current, sign) else {
                break;
            };
            if !next.is_finite()
                || !self.bbox.contains(&next)
                || next.distance_squared(&current) < min_advance
            {
                break;
            }
            if self.occupied.any_within(next, d_test, |_| true) {
                break;
            }

            let position = if sign < 0.0 { -(k as i64) } else { k as i64 };
            if self
                .own
                .any_within(next, d_test, |gp| (gp.position - position).abs() > window)
            {
                break;
            }

            self.own.insert(GridPoint {
                point: next,
                position,
            });
            points.push(next);
            current = next;
        }
        points
    }

    /// Trace the full streamline through `seed`, oriented along the flow.
    fn trace(&mut self, field: &dyn VectorField, seed: Vector2) -> Vec<Vector2> {
        self.own.clear();
        self.own.insert(GridPoint {
            point: seed,
            position: 0,
        });

        let forward = self.integrate(field, seed, 1.0);
        let backward = self.integrate(field, seed, -1.0);

        let mut points = Vec::with_capacity(backward.len() + 1 + forward.len());
        points.extend(backward.into_iter().rev());
        points.push(seed);
        points.extend(forward);
        points
    }

    /// Mark the streamline as occupied and queue seeds beside it.
    fn accept(&mut self, points: &[Vector2]) {
        let offset = self.config.d_sep * SEED_OFFSET_SCALE;
        let n = points.len();

        for (i, &p) in points.iter().enumerate() {
            self.occupied.insert(GridPoint { point: p, position: 0 });

            let tangent = points[(i + 1).min(n - 1)] - points[i.saturating_sub(1)];
            let len = tangent.length();
            if len <= 0.0 {
                continue;
            }
            let normal = Vector2::new(-tangent.y / len, tangent.x / len);
            for candidate in [p + normal * offset, p - normal * offset] {
                if self.bbox.contains(&candidate) {
                    self.candidates.push_back(candidate);
                }
            }
        }
    }
}

impl StreamlineGenerator for EvenlySpacedGenerator {
    fn step(
        &mut self,
        field: &dyn VectorField,
        on_added: &mut dyn FnMut(Vec<Vector2>),
    ) -> GeneratorStatus {
        if self.finished {
            return GeneratorStatus::Finished;
        }

        let mut traced = 0;
        while traced < self.config.steps_per_iteration {
            let Some(seed) = self.next_seed() else {
                self.finished = true;
                debug!(
                    streamlines = self.emitted,
                    occupied_points = self.occupied.len(),
                    "Streamline generation finished"
                );
                return GeneratorStatus::Finished;
            };
            if !self.is_valid_seed(field, seed) {
                continue;
            }

            traced += 1;
            let points = self.trace(field, seed);
            if points.len() < 2 {
                continue;
            }

            self.accept(&points);
            self.emitted += 1;
            trace!(
                index = self.emitted,
                points = points.len(),
                pending_seeds = self.candidates.len(),
                "Streamline added"
            );
            on_added(points);
        }

        GeneratorStatus::Running
    }
}

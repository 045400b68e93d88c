//! Progressive reveal of generated streamlines.
//!
//! Streamlines wait in a double-ended queue until a slot frees up in the
//! bounded working set. Every tick each active streamline is extended by a
//! randomized number of points, so lines grow at uneven rates and the map
//! fills in organically instead of all at once.
//!
//! ```text
//! generator -> queue (Pending) -> working set (Active) -> dropped (Done)
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;
use windmap_common::{SegmentSink, Vector2};

use crate::working_set::{AnimationTask, Streamline, WorkingSet};

/// Default number of streamlines drawn concurrently.
pub const DEFAULT_MAX_ANIMATIONS: usize = 20;

/// Default mean number of points revealed per streamline per tick.
pub const DEFAULT_POINTS_PER_ANIMATION: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("points_per_animation must be at least 1")]
    ZeroChunk,
}

/// Scheduler tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Working set capacity. Zero is legal and disables drawing.
    pub max_animations: usize,
    /// Chunk lengths are drawn from `[ppa / 2, ppa / 2 + ppa)`.
    pub points_per_animation: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_animations: DEFAULT_MAX_ANIMATIONS,
            points_per_animation: DEFAULT_POINTS_PER_ANIMATION,
        }
    }
}

/// Running counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub segments_drawn: u64,
    pub streamlines_started: u64,
    pub streamlines_completed: u64,
}

/// Owns the queue and working set and advances them once per frame.
pub struct AnimationScheduler<R: Rng> {
    config: SchedulerConfig,
    working_set: WorkingSet,
    queue: VecDeque<Arc<Streamline>>,
    rng: R,
    stats: SchedulerStats,
}

impl<R: Rng> AnimationScheduler<R> {
    pub fn new(config: SchedulerConfig, rng: R) -> Result<Self, SchedulerError> {
        if config.points_per_animation == 0 {
            return Err(SchedulerError::ZeroChunk);
        }
        Ok(Self {
            config,
            working_set: WorkingSet::with_capacity(config.max_animations),
            queue: VecDeque::new(),
            rng,
            stats: SchedulerStats::default(),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Append a streamline to the back of the queue.
    pub fn enqueue(&mut self, streamline: Arc<Streamline>) {
        self.queue.push_back(streamline);
    }

    /// Convenience for generator callbacks that hand over owned points.
    pub fn enqueue_points(&mut self, points: Vec<Vector2>) {
        self.enqueue(Arc::new(points));
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn active_len(&self) -> usize {
        self.working_set.len()
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    /// Nothing queued and nothing in progress.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.working_set.is_empty()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Advance one animation frame, drawing through `sink`.
    ///
    /// Returns the number of segments drawn.
    pub fn tick<S: SegmentSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let ppa = self.config.points_per_animation;
        let mut drawn = 0;

        for task in self.working_set.iter_mut() {
            let chunk = (self.rng.gen_range(0..ppa) + ppa / 2).max(1);
            drawn += task.advance(chunk, sink);
        }

        let completed = self.working_set.remove_done();
        let started = self.refill();

        self.stats.ticks += 1;
        self.stats.segments_drawn += drawn as u64;
        self.stats.streamlines_completed += completed as u64;
        self.stats.streamlines_started += started as u64;

        trace!(
            tick = self.stats.ticks,
            drawn = drawn,
            completed = completed,
            started = started,
            active = self.working_set.len(),
            queued = self.queue.len(),
            "Animation tick"
        );

        drawn
    }

    /// Move queued streamlines into free working set slots.
    fn refill(&mut self) -> usize {
        let mut started = 0;
        while !self.working_set.is_full() && !self.queue.is_empty() {
            let next = if self.rng.gen_bool(0.5) {
                self.queue.pop_front()
            } else {
                self.queue.pop_back()
            };
            let Some(streamline) = next else {
                break;
            };
            self.working_set.push(AnimationTask::new(streamline));
            started += 1;
        }
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_chunk_is_rejected() {
        let config = SchedulerConfig {
            max_animations: 1,
            points_per_animation: 0,
        };
        assert_eq!(
            AnimationScheduler::new(config, StdRng::seed_from_u64(1)).err(),
            Some(SchedulerError::ZeroChunk)
        );
    }

    #[test]
    fn test_refill_takes_from_queue_ends_only() {
        let config = SchedulerConfig {
            max_animations: 2,
            points_per_animation: 3,
        };
        let lines: Vec<Arc<Streamline>> = (0..6)
            .map(|i| Arc::new(vec![Vector2::new(0.0, i as f64), Vector2::new(1.0, i as f64)]))
            .collect();

        for seed in 0..20 {
            let mut scheduler = AnimationScheduler::new(config, StdRng::seed_from_u64(seed)).unwrap();
            for line in &lines {
                scheduler.enqueue(line.clone());
            }
            scheduler.tick(&mut |_: Vector2, _: Vector2| {});
            assert_eq!(scheduler.active_len(), 2);

            // What is left is an unbroken run of the original order.
            let rest: Vec<_> = scheduler.queue.iter().cloned().collect();
            assert_eq!(rest.len(), 4);
            assert!(
                lines
                    .windows(rest.len())
                    .any(|w| w.iter().zip(&rest).all(|(a, b)| Arc::ptr_eq(a, b))),
                "queue reordered with seed {}",
                seed
            );
        }
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_animations, 20);
        assert_eq!(config.points_per_animation, 42);
    }
}

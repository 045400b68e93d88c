//! Bounded set of streamlines currently being revealed.

use std::sync::Arc;

use windmap_common::{SegmentSink, Vector2};

/// An ordered path through the field, shared read-only once generated.
pub type Streamline = Vec<Vector2>;

/// Progressive draw of one streamline.
///
/// `cursor` is the index of the last point already drawn.
#[derive(Debug, Clone)]
pub struct AnimationTask {
    streamline: Arc<Streamline>,
    cursor: usize,
}

impl AnimationTask {
    pub fn new(streamline: Arc<Streamline>) -> Self {
        Self {
            streamline,
            cursor: 0,
        }
    }

    pub fn streamline(&self) -> &Arc<Streamline> {
        &self.streamline
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last drawable index, `None` for streamlines too short to draw.
    fn last_index(&self) -> Option<usize> {
        match self.streamline.len() {
            0 | 1 => None,
            n => Some(n - 1),
        }
    }

    /// True once every segment has been drawn.
    pub fn is_done(&self) -> bool {
        self.last_index().map_or(true, |last| self.cursor >= last)
    }

    /// Draw up to `chunk` more segments and move the cursor past them.
    ///
    /// Returns the number of segments drawn.
    pub fn advance<S: SegmentSink + ?Sized>(&mut self, chunk: usize, sink: &mut S) -> usize {
        let Some(last) = self.last_index() else {
            return 0;
        };

        let target = (self.cursor + chunk).min(last);
        let points = &self.streamline;
        for i in (self.cursor + 1)..=target {
            sink.draw_segment(points[i - 1], points[i]);
        }

        let drawn = target - self.cursor;
        self.cursor = target;
        drawn
    }
}

/// Fixed-capacity arena of active tasks.
///
/// Tasks are interchangeable, so removal swaps the last task into the freed
/// slot. Iteration order is unspecified and changes as tasks finish.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    tasks: Vec<AnimationTask>,
    capacity: usize,
}

impl WorkingSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    /// Add a task. The caller checks [`WorkingSet::is_full`] first.
    pub(crate) fn push(&mut self, task: AnimationTask) {
        debug_assert!(!self.is_full(), "working set over capacity");
        self.tasks.push(task);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationTask> {
        self.tasks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AnimationTask> {
        self.tasks.iter_mut()
    }

    /// Swap-and-pop every finished task. Returns how many were removed.
    pub fn remove_done(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].is_done() {
                // The swapped-in task lands at `i` and still needs checking.
                self.tasks.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Arc<Streamline> {
        Arc::new((0..n).map(|i| Vector2::new(i as f64, 0.0)).collect())
    }

    #[test]
    fn test_advance_clamps_to_last_point() {
        let mut task = AnimationTask::new(line(4));
        let mut segments = Vec::new();
        let mut sink = |a: Vector2, b: Vector2| segments.push((a.x, b.x));

        assert_eq!(task.advance(10, &mut sink), 3);
        assert!(task.is_done());
        assert_eq!(task.cursor(), 3);
        assert_eq!(segments, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_short_streamlines_are_done_immediately() {
        let mut drawn = 0;
        let mut sink = |_: Vector2, _: Vector2| drawn += 1;
        for n in [0, 1] {
            let mut task = AnimationTask::new(line(n));
            assert!(task.is_done());
            assert_eq!(task.advance(5, &mut sink), 0);
        }
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_remove_done_checks_swapped_in_task() {
        let mut set = WorkingSet::with_capacity(3);
        for n in [1, 1, 5] {
            set.push(AnimationTask::new(line(n)));
        }
        assert_eq!(set.remove_done(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().streamline().len(), 5);
    }

    #[test]
    fn test_is_full_tracks_capacity() {
        let mut set = WorkingSet::with_capacity(1);
        assert!(!set.is_full());
        set.push(AnimationTask::new(line(3)));
        assert!(set.is_full());

        assert!(WorkingSet::with_capacity(0).is_full());
    }
}

//! Streamline generation and animated reveal.
//!
//! - [`generator`]: evenly spaced streamline tracing over a vector field
//! - [`scheduler`]: frame-by-frame reveal of generated streamlines
//! - [`working_set`]: the bounded set of streamlines being drawn

pub mod generator;
pub mod scheduler;
pub mod working_set;

pub use generator::{
    EvenlySpacedGenerator, GeneratorConfig, GeneratorError, GeneratorStatus, StreamlineGenerator,
};
pub use scheduler::{AnimationScheduler, SchedulerConfig, SchedulerError, SchedulerStats};
pub use working_set::{AnimationTask, Streamline, WorkingSet};

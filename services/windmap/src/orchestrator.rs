//! Frame driver.
//!
//! One run goes through these phases:
//!
//! 1. Fill the background and draw the coastline once.
//! 2. Load the wind texture. If that fails the background frame is still
//!    written so the output path always holds an image.
//! 3. Build the sampler, gradient, generator and scheduler.
//! 4. Per frame: let the generator do a bounded slice of work, then reveal
//!    the next chunk of every active streamline.
//! 5. Stop when the frame limit is hit or everything has been drawn, and
//!    write the final frame.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::png::encode_frame;
use renderer::{
    ColorGradient, Coastline, PixmapTarget, RenderTarget, SegmentRenderer, VectorFieldSampler,
};
use streamlines::{AnimationScheduler, EvenlySpacedGenerator, GeneratorStatus, StreamlineGenerator};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};
use windmap_common::{WindmapError, WindmapResult};

use crate::config::WindmapConfig;
use crate::loader::{Source, WindTextureLoader};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub streamlines: usize,
    pub segments: u64,
    /// Generation finished and every streamline was fully drawn.
    pub complete: bool,
    pub snapshots: Vec<PathBuf>,
    pub output: PathBuf,
}

pub struct Orchestrator {
    config: WindmapConfig,
    loader: WindTextureLoader,
}

impl Orchestrator {
    /// Validate `config` and prepare the loader.
    pub fn new(config: WindmapConfig) -> WindmapResult<Self> {
        config.validate()?;
        let loader = WindTextureLoader::new(REQUEST_TIMEOUT)?;
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &WindmapConfig {
        &self.config
    }

    pub async fn run(&self) -> WindmapResult<RunSummary> {
        let render = &self.config.render;
        let output = &self.config.output;

        let gradient = ColorGradient::new(self.config.gradient.resolve()?)?;
        let mut target = PixmapTarget::new(render.width, render.height, render.line_width)?;
        target.fill(render.background_rgb()?);

        if let Some(coastline) = &self.config.sources.coastline {
            self.draw_coastline(&mut target, &Source::parse(coastline))
                .await?;
        }

        let wind_source = Source::parse(&self.config.sources.wind);
        let buffer = match self.loader.load(&wind_source).await {
            Ok(buffer) => buffer,
            Err(e) => {
                error!(source = %wind_source, error = %e, "Failed to load wind texture");
                save_frame(&target, &output.path).await?;
                return Err(e.into());
            }
        };
        info!(
            source = %wind_source,
            width = buffer.width(),
            height = buffer.height(),
            "Loaded wind texture"
        );

        let sampler = VectorFieldSampler::new(buffer, self.config.calibration);
        let bbox = sampler.bounding_box();
        let mut generator = EvenlySpacedGenerator::new(bbox, self.config.generator)
            .map_err(|e| WindmapError::Config(e.to_string()))?;
        let rng = match self.config.animation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut scheduler = AnimationScheduler::new(self.config.animation.scheduler_config(), rng)
            .map_err(|e| WindmapError::Config(e.to_string()))?;

        let mut pacing = frame_interval(self.config.animation.fps);
        let mut snapshots = Vec::new();
        let mut frame: u64 = 0;
        let mut generating = true;

        loop {
            if let Some(limit) = self.config.animation.frames {
                if frame >= limit {
                    info!(frame, "Frame limit reached");
                    break;
                }
            }
            if !generating && scheduler.is_idle() {
                break;
            }
            if let Some(pacing) = pacing.as_mut() {
                pacing.tick().await;
            }
            frame += 1;

            if generating {
                let status =
                    generator.step(&sampler, &mut |points| scheduler.enqueue_points(points));
                generating = status == GeneratorStatus::Running;
                if !generating {
                    info!(
                        frame,
                        streamlines = generator.emitted(),
                        "Streamline generation finished"
                    );
                }
            }

            let drawn = {
                let mut renderer = SegmentRenderer::new(&sampler, &gradient, bbox, &mut target);
                scheduler.tick(&mut renderer)
            };
            debug!(
                frame,
                drawn,
                active = scheduler.active_len(),
                queued = scheduler.queue_len(),
                "Rendered frame"
            );

            if let Some(every) = output.snapshot_every {
                if frame % every == 0 {
                    let path = output.snapshot_path(frame);
                    save_frame(&target, &path).await?;
                    snapshots.push(path);
                }
            }
        }

        let bytes = save_frame(&target, &output.path).await?;
        let stats = scheduler.stats();
        let summary = RunSummary {
            frames: frame,
            streamlines: generator.emitted(),
            segments: stats.segments_drawn,
            complete: !generating && scheduler.is_idle(),
            snapshots,
            output: output.path.clone(),
        };

        info!(
            frames = summary.frames,
            streamlines = summary.streamlines,
            segments = summary.segments,
            complete = summary.complete,
            bytes,
            output = %summary.output.display(),
            "Animation finished"
        );

        Ok(summary)
    }

    async fn draw_coastline(&self, target: &mut PixmapTarget, source: &Source) -> WindmapResult<()> {
        let json = self.loader.load_text(source).await?;
        let coastline = Coastline::from_geojson(&json)?;
        coastline.draw(target, self.config.render.coastline_rgb()?);
        info!(source = %source, lines = coastline.lines().len(), "Drew coastline");
        Ok(())
    }
}

/// `None` when pacing is disabled.
fn frame_interval(fps: u32) -> Option<Interval> {
    if fps == 0 {
        return None;
    }
    let mut pacing = interval(Duration::from_secs_f64(1.0 / fps as f64));
    pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(pacing)
}

/// Encode `target` and write it to `path`, creating parent directories.
pub async fn save_frame(target: &PixmapTarget, path: &Path) -> WindmapResult<usize> {
    let bytes = encode_frame(target).map_err(WindmapError::Render)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            WindmapError::Render(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| WindmapError::Render(format!("Failed to write {}: {}", path.display(), e)))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote frame");
    Ok(bytes.len())
}

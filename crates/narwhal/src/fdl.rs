//! Force-directed iteration driver.
//!
//! A [`Layout`] owns a [`Synchroniser`] and a list of [`Force`]s. Each iteration rebuilds the
//! [`Locator`] from the current positions, sums the force fields computed against that
//! snapshot, and moves every mirror node in the drawing plane by its clamped total force.

use crate::error::Result;
use crate::force::{Force, ForceCache, ForceContext, ForceField, add, zero_field};
use crate::locator::Locator;
use crate::options::LayoutOptions;
use crate::stc::Synchroniser;
use narwhal_dygraph::{DyGraph, Geometry};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Locator cells are this many desired distances wide.
const LOCATOR_CELL_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutState {
    #[default]
    Idle,
    Running,
    /// The last run executed every requested iteration.
    Converged,
    /// The last run was cut short by its budget or by cancellation.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    TimeLimit,
    Cancelled,
}

/// Wall-clock limit of one run. The iteration count is passed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    pub max_time: Option<Duration>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn time(limit: Duration) -> Self {
        Self {
            max_time: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub iterations: usize,
    pub running_time: Duration,
    /// Temperature the next iteration of the run would have used.
    pub final_temperature: f64,
    pub stop: StopReason,
}

#[derive(Debug, Default, Clone)]
struct LayoutTimings {
    locator: Duration,
    forces: Duration,
    displacement: Duration,
}

pub struct Layout {
    sync: Synchroniser,
    options: LayoutOptions,
    forces: Vec<Force>,
    geometry: Geometry,
    cache: ForceCache,
    state: LayoutState,
    cancel: Arc<AtomicBool>,
}

impl Layout {
    /// Builds the mirror graph of `original` and the forces enabled in `options`.
    pub fn new(original: DyGraph, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        let sync = Synchroniser::build(original, options.time_factor)?;
        Self::with_synchroniser(sync, options)
    }

    pub fn with_synchroniser(sync: Synchroniser, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            forces: Force::from_options(&options),
            geometry: Geometry::e3d().with_epsilon(options.epsilon),
            sync,
            options,
            cache: ForceCache::new(),
            state: LayoutState::Idle,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the force list.
    pub fn with_forces(mut self, forces: Vec<Force>) -> Self {
        self.forces = forces;
        self
    }

    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn synchroniser(&self) -> &Synchroniser {
        &self.sync
    }

    pub fn synchroniser_mut(&mut self) -> &mut Synchroniser {
        &mut self.sync
    }

    pub fn into_synchroniser(self) -> Synchroniser {
        self.sync
    }

    /// Flag that stops a running [`Layout::iterate`] before its next iteration. The flag stays
    /// set until it is cleared through the handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs `n` iterations within the configured time limit.
    pub fn iterate(&mut self, n: usize) -> Statistics {
        let budget = Budget {
            max_time: self.options.time_limit(),
        };
        self.iterate_with(n, budget)
    }

    pub fn iterate_with(&mut self, n: usize, budget: Budget) -> Statistics {
        let timing_enabled = std::env::var("NARWHAL_LAYOUT_TIMING").ok().as_deref() == Some("1");
        let mut timings = LayoutTimings::default();

        let start = Instant::now();
        let schedule = self.options.temperature;
        self.state = LayoutState::Running;
        self.cache.clear();

        let mut done = 0;
        let mut stop = StopReason::Completed;
        while done < n {
            if self.cancel.load(Ordering::Relaxed) {
                stop = StopReason::Cancelled;
                break;
            }
            if budget.max_time.is_some_and(|limit| start.elapsed() >= limit) {
                stop = StopReason::TimeLimit;
                break;
            }
            let temperature = schedule.temperature(done, n);
            let max_displacement = self.step(
                temperature,
                if timing_enabled {
                    Some(&mut timings)
                } else {
                    None
                },
            );
            tracing::trace!(iteration = done, temperature, max_displacement, "layout iteration");
            done += 1;
        }

        let stats = Statistics {
            iterations: done,
            running_time: start.elapsed(),
            final_temperature: schedule.temperature(done, n),
            stop,
        };
        self.state = if stop == StopReason::Completed {
            LayoutState::Converged
        } else {
            tracing::warn!(
                iterations = done,
                requested = n,
                reason = ?stop,
                "layout stopped before completing"
            );
            LayoutState::Stopped
        };

        tracing::info!(
            iterations = stats.iterations,
            running_time = ?stats.running_time,
            mirror_nodes = self.sync.mirror().node_count(),
            forces = self.forces.len(),
            "layout run finished"
        );
        if timing_enabled {
            tracing::info!(
                locator = ?timings.locator,
                forces = ?timings.forces,
                displacement = ?timings.displacement,
                "layout timings"
            );
        }
        stats
    }

    /// Spatial index of the current positions.
    pub fn locator(&self) -> Locator {
        Locator::build(
            self.sync.mirror(),
            self.sync.positions(),
            self.options.desired_distance * LOCATOR_CELL_FACTOR,
        )
    }

    /// Sum of every force field at `temperature`.
    ///
    /// # Panics
    ///
    /// Panics when a force produces a non-finite vector.
    pub fn compute_forces(&self, locator: &Locator, temperature: f64) -> ForceField {
        let ctx = ForceContext {
            sync: &self.sync,
            locator,
            geometry: self.geometry,
            temperature,
            cache: &self.cache,
        };
        let mut total = zero_field(&self.sync);
        for force in &self.forces {
            let field = force.compute(&ctx);
            for (m, f) in field.iter() {
                assert!(
                    f.iter().all(|v| v.is_finite()),
                    "{} produced a non-finite force {:?} on mirror node {}",
                    force.name(),
                    f,
                    self.sync.mirror().node_id(m)
                );
                add(&mut total, m, *f);
            }
        }
        total
    }

    /// One iteration; returns the largest displacement applied.
    fn step(&mut self, temperature: f64, mut timings: Option<&mut LayoutTimings>) -> f64 {
        let locator_start = timings.is_some().then(Instant::now);
        let locator = self.locator();
        if let (Some(s), Some(t)) = (locator_start, timings.as_deref_mut()) {
            t.locator += s.elapsed();
        }

        let forces_start = timings.is_some().then(Instant::now);
        let field = self.compute_forces(&locator, temperature);
        if let (Some(s), Some(t)) = (forces_start, timings.as_deref_mut()) {
            t.forces += s.elapsed();
        }

        let displacement_start = timings.is_some().then(Instant::now);
        let max_step = self.options.temperature.max_step(temperature);
        let mut max_displacement = 0.0_f64;
        for m in self.sync.mirror().node_indices() {
            let f = field.get(m);
            let length = f.x.hypot(f.y);
            let scale = if length > max_step {
                max_step / length
            } else {
                1.0
            };
            self.sync.displace(m, f.x * scale, f.y * scale);
            max_displacement = max_displacement.max(length * scale);
        }
        if let (Some(s), Some(t)) = (displacement_start, timings) {
            t.displacement += s.elapsed();
        }
        max_displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn layout_can_move_to_another_thread() {
        assert_send::<Layout>();
    }

    #[test]
    fn empty_graph_converges() {
        let mut layout = Layout::new(DyGraph::new(), LayoutOptions::default()).unwrap();
        assert_eq!(layout.state(), LayoutState::Idle);
        let stats = layout.iterate(3);
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.stop, StopReason::Completed);
        assert_eq!(stats.final_temperature, 0.0);
        assert_eq!(layout.state(), LayoutState::Converged);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = LayoutOptions {
            desired_distance: -1.0,
            ..Default::default()
        };
        assert!(Layout::new(DyGraph::new(), options).is_err());
    }
}

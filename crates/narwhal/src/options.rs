//! Layout configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Force exponent interpolated between a hot (`initial`) and a cold (`final`) value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exponent {
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_: f64,
}

impl Exponent {
    pub const fn new(initial: f64, final_: f64) -> Self {
        Self { initial, final_ }
    }

    /// `final + (initial - final) * temperature`
    pub fn at(&self, temperature: f64) -> f64 {
        self.final_ + (self.initial - self.final_) * temperature
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceOptions {
    pub gravity: bool,
    pub node_node_repulsion: bool,
    pub edge_repulsion: bool,
    pub connection_attraction: bool,
    pub time_straightening: bool,
    pub mental_map_preservation: bool,
    pub pole_attraction: bool,
    pub circumference_repulsion: bool,
    pub non_cluster_node_repulsion: bool,

    pub node_node_exponent: Exponent,
    pub edge_repulsion_exponent: Exponent,
    pub connection_exponent: Exponent,
    pub circumference_exponent: Exponent,
    pub non_cluster_exponent: Exponent,

    /// Multiple of the desired distance within which two nodes repel each other.
    pub activity_factor: f64,
    pub pole_attraction_factor: f64,
    /// Number of sides of the polygon approximating a cluster circumference.
    pub circumference_sides: usize,
    /// Extra distance kept between a pole and nodes outside its cluster.
    pub non_cluster_margin: f64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            gravity: true,
            node_node_repulsion: true,
            edge_repulsion: true,
            connection_attraction: true,
            time_straightening: true,
            mental_map_preservation: true,
            pole_attraction: true,
            circumference_repulsion: true,
            non_cluster_node_repulsion: true,

            node_node_exponent: Exponent::new(1.0, 2.0),
            edge_repulsion_exponent: Exponent::new(1.0, 3.0),
            connection_exponent: Exponent::new(4.0, 2.0),
            circumference_exponent: Exponent::new(1.0, 2.0),
            non_cluster_exponent: Exponent::new(4.0, 2.0),

            activity_factor: 3.0,
            pole_attraction_factor: 1.0,
            circumference_sides: 32,
            non_cluster_margin: 10.0,
        }
    }
}

/// Temperature and step bounds of the annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSchedule {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    /// Largest per-iteration displacement at the initial temperature.
    pub initial_max_step: f64,
    /// Largest per-iteration displacement at temperature zero.
    pub final_max_step: f64,
}

impl Default for TemperatureSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            final_temperature: 0.0,
            initial_max_step: 10.0,
            final_max_step: 0.5,
        }
    }
}

impl TemperatureSchedule {
    /// Temperature of iteration `k` out of `n`, cooling linearly from the initial to the final
    /// temperature.
    pub fn temperature(&self, k: usize, n: usize) -> f64 {
        if n == 0 {
            return self.final_temperature;
        }
        let progress = k as f64 / n as f64;
        self.initial_temperature + (self.final_temperature - self.initial_temperature) * progress
    }

    pub fn max_step(&self, temperature: f64) -> f64 {
        self.final_max_step + (self.initial_max_step - self.final_max_step) * temperature
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Mirror-graph `z` units per unit of time.
    pub time_factor: f64,
    pub iterations: usize,
    /// Wall-clock budget in seconds for one `iterate` call.
    pub time_limit_secs: Option<f64>,
    /// Desired separation between glyph centres.
    pub desired_distance: f64,
    /// Cluster radius as a multiple of the desired distance.
    pub cluster_radius_factor: f64,
    pub epsilon: f64,
    pub forces: ForceOptions,
    pub temperature: TemperatureSchedule,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            time_factor: 1.0,
            iterations: 100,
            time_limit_secs: None,
            desired_distance: 5.0,
            cluster_radius_factor: 2.5,
            epsilon: narwhal_dygraph::Geometry::DEFAULT_EPSILON,
            forces: ForceOptions::default(),
            temperature: TemperatureSchedule::default(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("expected a finite positive number, got {value}"),
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("expected a finite number, got {value}"),
        })
    }
}

impl LayoutOptions {
    pub fn cluster_radius(&self) -> f64 {
        self.desired_distance * self.cluster_radius_factor
    }

    /// Limits too large for a [`Duration`] saturate to [`Duration::MAX`].
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .map(|secs| Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }

    pub fn validate(&self) -> Result<()> {
        positive("time_factor", self.time_factor)?;
        positive("desired_distance", self.desired_distance)?;
        positive("cluster_radius_factor", self.cluster_radius_factor)?;
        positive("epsilon", self.epsilon)?;
        if let Some(limit) = self.time_limit_secs {
            if Duration::try_from_secs_f64(limit).is_err() {
                return Err(Error::InvalidOption {
                    name: "time_limit_secs",
                    reason: format!("expected a non-negative number of seconds, got {limit}"),
                });
            }
        }
        self.forces.validate()?;
        self.temperature.validate()
    }
}

impl ForceOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, e) in [
            ("node_node_exponent", self.node_node_exponent),
            ("edge_repulsion_exponent", self.edge_repulsion_exponent),
            ("connection_exponent", self.connection_exponent),
            ("circumference_exponent", self.circumference_exponent),
            ("non_cluster_exponent", self.non_cluster_exponent),
        ] {
            finite(name, e.initial)?;
            finite(name, e.final_)?;
        }
        positive("activity_factor", self.activity_factor)?;
        finite("pole_attraction_factor", self.pole_attraction_factor)?;
        finite("non_cluster_margin", self.non_cluster_margin)?;
        if self.circumference_sides < 3 {
            return Err(Error::InvalidOption {
                name: "circumference_sides",
                reason: format!("a polygon needs at least 3 sides, got {}", self.circumference_sides),
            });
        }
        Ok(())
    }
}

impl TemperatureSchedule {
    pub fn validate(&self) -> Result<()> {
        for (name, t) in [
            ("initial_temperature", self.initial_temperature),
            ("final_temperature", self.final_temperature),
        ] {
            if !(t.is_finite() && (0.0..=1.0).contains(&t)) {
                return Err(Error::InvalidOption {
                    name,
                    reason: format!("expected a temperature in [0, 1], got {t}"),
                });
            }
        }
        positive("initial_max_step", self.initial_max_step)?;
        positive("final_max_step", self.final_max_step)
    }
}

//! Modular forces.
//!
//! Every force is a pure function from the current mirror-graph state to a [`ForceField`]: one
//! vector per mirror node. The driver sums the fields of all enabled forces and applies them in
//! a single displacement pass, so no force ever observes another force's effect within an
//! iteration.

mod cluster;
mod connection;
mod distances;
mod gravity;
mod repulsion;
mod time;

pub use distances::{DyDistances, MINIMAL_DISTANCE};

use crate::locator::Locator;
use crate::options::{Exponent, LayoutOptions};
use crate::stc::Synchroniser;
use narwhal_dygraph::{Coordinates, Geometry, NodeAttribute, NodeIx};
use std::cell::OnceCell;

/// One force vector per mirror node.
pub type ForceField = NodeAttribute<Coordinates>;

/// Number of trajectory neighbours on each side considered by mental-map preservation.
pub const MENTAL_MAP_WINDOW: usize = 5;

/// Time straightening works at a fifth of the desired node distance.
const TIME_STRAIGHTENING_DIVISOR: f64 = 5.0;

/// Values computed once per layout run and shared by every iteration.
#[derive(Debug, Default)]
pub struct ForceCache {
    centroid: OnceCell<Coordinates>,
}

impl ForceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Centroid of the mirror positions in the drawing plane, computed on first use.
    pub fn centroid(&self, sync: &Synchroniser) -> Coordinates {
        *self.centroid.get_or_init(|| gravity::centroid(sync))
    }

    pub fn clear(&mut self) {
        self.centroid = OnceCell::new();
    }
}

/// Read-only state a force is computed from.
#[derive(Clone, Copy)]
pub struct ForceContext<'a> {
    pub sync: &'a Synchroniser,
    pub locator: &'a Locator,
    /// 3D kernel; forces acting in the drawing plane use [`Geometry::as_2d`].
    pub geometry: Geometry,
    /// 1 when hot, 0 when converged.
    pub temperature: f64,
    pub cache: &'a ForceCache,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    /// Unit pull of every mirror node toward the cached centroid.
    Gravity,
    NodeNodeRepulsion {
        distance: f64,
        activity_factor: f64,
        exponent: Exponent,
    },
    /// Repulsion between mirror nodes and segments of other trajectories.
    EdgeRepulsion { distance: f64, exponent: Exponent },
    /// Keeps the two trajectories of a connection close while the connection is present.
    ConnectionAttraction { distance: f64, exponent: Exponent },
    TimeStraightening { distance: f64 },
    MentalMapPreservation { distance: f64, window: usize },
    PoleAttraction { factor: f64 },
    /// Keeps cluster members inside a polygonal circle around their pole.
    CircumferenceRepulsion {
        radius: f64,
        distance: f64,
        sides: usize,
        exponent: Exponent,
    },
    /// Pushes nodes outside every cluster away from poles.
    NonClusterNodeRepulsion { distance: f64, exponent: Exponent },
}

impl Force {
    pub fn name(&self) -> &'static str {
        match self {
            Force::Gravity => "gravity",
            Force::NodeNodeRepulsion { .. } => "node_node_repulsion",
            Force::EdgeRepulsion { .. } => "edge_repulsion",
            Force::ConnectionAttraction { .. } => "connection_attraction",
            Force::TimeStraightening { .. } => "time_straightening",
            Force::MentalMapPreservation { .. } => "mental_map_preservation",
            Force::PoleAttraction { .. } => "pole_attraction",
            Force::CircumferenceRepulsion { .. } => "circumference_repulsion",
            Force::NonClusterNodeRepulsion { .. } => "non_cluster_node_repulsion",
        }
    }

    pub fn compute(&self, ctx: &ForceContext<'_>) -> ForceField {
        match *self {
            Force::Gravity => gravity::gravity(ctx),
            Force::NodeNodeRepulsion {
                distance,
                activity_factor,
                exponent,
            } => repulsion::node_node(ctx, distance, activity_factor, exponent),
            Force::EdgeRepulsion { distance, exponent } => {
                repulsion::node_segment(ctx, distance, exponent)
            }
            Force::ConnectionAttraction { distance, exponent } => {
                connection::attraction(ctx, distance, exponent)
            }
            Force::TimeStraightening { distance } => time::straightening(ctx, distance),
            Force::MentalMapPreservation { distance, window } => {
                time::mental_map(ctx, distance, window)
            }
            Force::PoleAttraction { factor } => cluster::pole_attraction(ctx, factor),
            Force::CircumferenceRepulsion {
                radius,
                distance,
                sides,
                exponent,
            } => cluster::circumference_repulsion(ctx, radius, distance, sides, exponent),
            Force::NonClusterNodeRepulsion { distance, exponent } => {
                cluster::non_cluster_repulsion(ctx, distance, exponent)
            }
        }
    }

    /// The enabled forces of `options`, in a fixed order.
    pub fn from_options(options: &LayoutOptions) -> Vec<Force> {
        let f = &options.forces;
        let d = options.desired_distance;
        let mut forces = Vec::new();
        if f.gravity {
            forces.push(Force::Gravity);
        }
        if f.node_node_repulsion {
            forces.push(Force::NodeNodeRepulsion {
                distance: d,
                activity_factor: f.activity_factor,
                exponent: f.node_node_exponent,
            });
        }
        if f.edge_repulsion {
            forces.push(Force::EdgeRepulsion {
                distance: d,
                exponent: f.edge_repulsion_exponent,
            });
        }
        if f.connection_attraction {
            forces.push(Force::ConnectionAttraction {
                distance: d,
                exponent: f.connection_exponent,
            });
        }
        if f.time_straightening {
            forces.push(Force::TimeStraightening {
                distance: d / TIME_STRAIGHTENING_DIVISOR,
            });
        }
        if f.mental_map_preservation {
            forces.push(Force::MentalMapPreservation {
                distance: d,
                window: MENTAL_MAP_WINDOW,
            });
        }
        if f.pole_attraction {
            forces.push(Force::PoleAttraction {
                factor: f.pole_attraction_factor,
            });
        }
        if f.circumference_repulsion {
            forces.push(Force::CircumferenceRepulsion {
                radius: options.cluster_radius(),
                distance: d,
                sides: f.circumference_sides,
                exponent: f.circumference_exponent,
            });
        }
        if f.non_cluster_node_repulsion {
            forces.push(Force::NonClusterNodeRepulsion {
                distance: options.cluster_radius() + f.non_cluster_margin,
                exponent: f.non_cluster_exponent,
            });
        }
        forces
    }
}

pub(crate) fn zero_field(sync: &Synchroniser) -> ForceField {
    NodeAttribute::with_len(Coordinates::zeros(), sync.mirror().node_count())
}

pub(crate) fn add(field: &mut ForceField, n: NodeIx, force: Coordinates) {
    *field.get_mut(n) += force;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_forces_are_skipped() {
        let mut options = LayoutOptions::default();
        assert_eq!(Force::from_options(&options).len(), 9);

        options.forces.gravity = false;
        options.forces.pole_attraction = false;
        let names: Vec<_> = Force::from_options(&options)
            .iter()
            .map(Force::name)
            .collect();
        assert_eq!(names.len(), 7);
        assert!(!names.contains(&"gravity"));
        assert!(!names.contains(&"pole_attraction"));
    }

    #[test]
    fn straightening_uses_a_fifth_of_the_distance() {
        let options = LayoutOptions::default();
        let straightening = Force::from_options(&options)
            .into_iter()
            .find(|f| matches!(f, Force::TimeStraightening { .. }));
        assert_eq!(
            straightening,
            Some(Force::TimeStraightening { distance: 1.0 })
        );
    }
}

#![forbid(unsafe_code)]

//! Space-time cube layout of dynamic graphs.
//!
//! `narwhal` mirrors a [`DyGraph`] into a static 3D graph whose `z` axis is time
//! ([`stc::Synchroniser`]), lays that graph out with a set of modular forces ([`fdl::Layout`]),
//! and writes the resulting trajectories back into the dynamic graph so that
//! [`DyGraph::snapshot_at`] yields the animated drawing.

pub mod error;
pub mod fdl;
pub mod force;
pub mod locator;
pub mod options;
pub mod placement;
pub mod stc;

pub use error::{Error, Result};
pub use fdl::{Budget, Layout, LayoutState, Statistics, StopReason};
pub use force::{DyDistances, Force, ForceCache, ForceContext, ForceField};
pub use locator::Locator;
pub use options::{Exponent, ForceOptions, LayoutOptions, TemperatureSchedule};
pub use stc::{MirrorConnection, MirrorGraph, MirrorLine, MirrorNode, Origin, Synchroniser};

pub use narwhal_dygraph::DyGraph;

/// Lays out `graph` with `options.iterations` iterations and writes the positions back.
pub fn layout(graph: DyGraph, options: &LayoutOptions) -> Result<(Synchroniser, Statistics)> {
    let mut layout = Layout::new(graph, options.clone())?;
    let stats = layout.iterate(options.iterations);
    let mut sync = layout.into_synchroniser();
    sync.export_positions();
    Ok((sync, stats))
}

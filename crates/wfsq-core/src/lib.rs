//! Filter translation and query pagination engine for WFS sources.
//!
//! The engine rewrites an abstract, protocol-agnostic filter tree into the
//! OGC Filter Encoding dialect of a target protocol generation (1.0 / 1.1 /
//! 2.0), honoring the operators the live server advertises and degrading
//! through documented operator fallbacks when it does not. A companion
//! planner turns the compiled filter plus paging inputs into one or more
//! protocol queries, emulating a result offset for generations without one.
//!
//! Everything here is a pure function over immutable inputs: no I/O, no
//! shared mutable state, no clocks (the compile context carries "now").
//! Transport, capability discovery, and tree-to-XML mapping live outside
//! this crate.

pub mod capability;
pub mod compile;
pub mod config;
pub mod error;
pub mod geometry;
pub mod plan;
pub mod resolve;

pub use error::Error;

/// Earth's mean radius in meters, used to convert metric buffer distances to
/// degrees of latitude.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        capability::Capabilities,
        compile::{CompiledFilter, CompiledNode, FilterCompiler},
        config::SourceConfig,
        plan::{PageResult, Paged, QueryPlan, QueryPlanner, SortSpec, SubQuery},
    };
}

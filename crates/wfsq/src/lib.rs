//! WFSQ: capability-aware OGC Filter translation and query pagination for
//! federated WFS sources.
//!
//! ## Crate layout
//! - `model`: input vocabulary — abstract filter AST, operator enums,
//!   feature schemas, capability documents, protocol versions.
//! - `core`: the engine — capability model, attribute resolver, geometry
//!   codec, predicate/combinator compiler, query/pagination planner.
//!
//! The `prelude` module mirrors the surface an adapter implementation uses.

pub use wfsq_core as core;
pub use wfsq_model as model;

pub use wfsq_core::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::core::{
        capability::Capabilities,
        compile::{CompiledFilter, CompiledNode, FilterCompiler},
        config::SourceConfig,
        plan::{PageResult, Paged, QueryPlan, QueryPlanner, SortSpec, SubQuery},
    };
    pub use crate::model::{
        capability::{CapabilityDocument, SortOrder},
        filter::{ComparisonOp, Filter, Literal, PropertyRef, SpatialOp, TemporalOp},
        schema::{FeatureSchema, PropertyKind},
        version::{AxisOrder, WfsVersion},
    };
}

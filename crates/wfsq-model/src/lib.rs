//! Input vocabulary for the WFSQ engine: abstract filter trees, operator
//! enums, feature schemas, capability documents, and protocol versions.
//!
//! This crate is pure data. Translation semantics (capability gating,
//! operator fallbacks, geometry encoding, pagination) live in `wfsq-core`.

pub mod capability;
pub mod filter;
pub mod schema;
pub mod version;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        capability::{CapabilityDocument, SortOrder},
        filter::{ComparisonOp, Filter, Literal, PropertyRef, SpatialOp, TemporalOp},
        schema::{FeatureSchema, PropertyKind},
        version::{AxisOrder, WfsVersion},
    };
}

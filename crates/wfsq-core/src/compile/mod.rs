//! Predicate compiler: capability-gated lowering from the abstract filter
//! tree to the target grammar.
//!
//! Compilation is pure and deterministic: the same filter against the same
//! {capabilities, schema, config, now} snapshot always produces a
//! structurally identical result. Capability gaps travel as the Invalid
//! sentinel; illegal input and structural misuse abort with a hard error.

pub(crate) mod combine;
pub(crate) mod comparison;
pub(crate) mod compiled;
pub(crate) mod spatial;
pub(crate) mod temporal;


pub use compiled::{
    ComparisonNode, CompiledFilter, CompiledNode, EncodedGeometry, IdSet, LogicalNode, SpatialNode,
    TemporalNode, TimeBound,
};

use crate::{capability::Capabilities, config::SourceConfig, geometry::WktError, resolve::ResolveError};
use thiserror::Error as ThisError;
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use wfsq_model::{filter::Filter, schema::FeatureSchema};

///
/// CompileError
///
/// Hard failures only. A capability gap is never an error; it compiles to
/// [`CompiledFilter::Invalid`] instead.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
#[remain::sorted]
pub enum CompileError {
    #[error("feature id filter carries no ids")]
    EmptyIdSet,

    #[error("comparison literal for property '{property}' is empty")]
    EmptyLiteral { property: String },

    #[error("date literal '{literal}' is not an ISO-8601 instant")]
    InvalidDate { literal: String },

    #[error("server does not advertise logical operators; compound filters are not representable")]
    LogicalOpsUnsupported,

    #[error("between comparison on property '{property}' requires lower and upper bounds")]
    MissingBounds { property: String },

    #[error("spatial operator on property '{property}' requires a distance")]
    MissingDistance { property: String },

    #[error("comparison on property '{property}' requires a literal operand")]
    MissingLiteral { property: String },

    #[error("feature id predicates cannot be combined with other predicate kinds")]
    MixedIdFilter,

    #[error("feature id predicates cannot be negated")]
    NegatedIdFilter,

    #[error("spatial distance must be non-negative, got {meters}")]
    NegativeDistance { meters: f64 },

    #[error("temporal comparison on property '{property}' has the wrong operand shape")]
    TemporalShape { property: String },

    #[error(transparent)]
    Unqueryable(#[from] ResolveError),

    #[error(transparent)]
    Wkt(#[from] WktError),
}

///
/// FilterCompiler
///
/// Borrows one self-consistent {Capabilities, FeatureSchema, SourceConfig}
/// snapshot plus the caller's clock value, and compiles abstract filters
/// against it. Cheap to construct per query; holds no state of its own.
///

#[derive(Clone, Copy, Debug)]
pub struct FilterCompiler<'a> {
    pub(crate) caps: &'a Capabilities,
    pub(crate) schema: &'a FeatureSchema,
    pub(crate) config: &'a SourceConfig,
    pub(crate) now: OffsetDateTime,
}

impl<'a> FilterCompiler<'a> {
    #[must_use]
    pub const fn new(
        caps: &'a Capabilities,
        schema: &'a FeatureSchema,
        config: &'a SourceConfig,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            caps,
            schema,
            config,
            now,
        }
    }

    /// Compile one abstract filter tree.
    pub fn compile(&self, filter: &Filter) -> Result<CompiledFilter, CompileError> {
        match filter {
            Filter::Comparison(cmp) => comparison::compile(self, cmp),
            Filter::Spatial(spatial) => spatial::compile(self, spatial),
            Filter::Temporal(temporal) => temporal::compile(self, temporal),
            Filter::And(children) => {
                let compiled = self.compile_children(children)?;
                self.and(compiled)
            }
            Filter::Or(children) => {
                let compiled = self.compile_children(children)?;
                self.or(compiled)
            }
            Filter::Not(child) => {
                let compiled = self.compile(child)?;
                self.not(compiled)
            }
            Filter::FeatureId(ids) => {
                if ids.is_empty() {
                    return Err(CompileError::EmptyIdSet);
                }
                let ids: IdSet = ids.iter().map(String::as_str).collect();
                Ok(CompiledFilter::Node(CompiledNode::Id(ids)))
            }
        }
    }

    /// Combine compiled children with logical AND.
    pub fn and(&self, children: Vec<CompiledFilter>) -> Result<CompiledFilter, CompileError> {
        combine::and(self.caps, children)
    }

    /// Combine compiled children with logical OR.
    pub fn or(&self, children: Vec<CompiledFilter>) -> Result<CompiledFilter, CompileError> {
        combine::or(self.caps, children)
    }

    /// Negate a compiled child.
    pub fn not(&self, child: CompiledFilter) -> Result<CompiledFilter, CompileError> {
        combine::not(self.caps, child)
    }

    fn compile_children(&self, children: &[Filter]) -> Result<Vec<CompiledFilter>, CompileError> {
        children.iter().map(|child| self.compile(child)).collect()
    }

    /// Format the context clock as a wire instant.
    pub(crate) fn now_instant(&self) -> Result<String, CompileError> {
        format_instant(self.now)
    }
}

const INSTANT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const DATE_ONLY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Normalize a date literal to ISO-8601 UTC with no sub-second precision.
///
/// Accepts a full RFC 3339 instant (any offset) or a bare date, which reads
/// as midnight UTC.
pub(crate) fn normalize_instant(text: &str) -> Result<String, CompileError> {
    let utc = if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        instant.to_offset(UtcOffset::UTC)
    } else {
        let date = Date::parse(text, DATE_ONLY_FORMAT).map_err(|_| CompileError::InvalidDate {
            literal: text.to_string(),
        })?;
        date.midnight().assume_utc()
    };

    format_instant(utc)
}

pub(crate) fn format_instant(at: OffsetDateTime) -> Result<String, CompileError> {
    at.to_offset(UtcOffset::UTC)
        .format(INSTANT_FORMAT)
        .map_err(|_| CompileError::InvalidDate {
            literal: at.to_string(),
        })
}

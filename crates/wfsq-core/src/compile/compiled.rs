use crate::geometry::{Geometry, GeometryOperand};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeSet;
use wfsq_model::filter::{ComparisonOp, SpatialOp, TemporalOp};

///
/// CompiledFilter
///
/// The compiler's output: a predicate tree in the target grammar, or one of
/// two sentinels. Exactly one of {Invalid, Empty, Node} holds; values are
/// immutable once produced and consumed exactly once by the planner.
///
/// - `Invalid` — not representable given the server's capabilities. Poisons
///   any combination it appears in; surfaces as an unsupported-query failure
///   only when no feature type yields a usable filter.
/// - `Empty` — syntactically valid but criteria-less (e.g. a content-type
///   predicate resolved by external routing). Absorbed by combinations.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledFilter {
    Empty,
    Invalid,
    Node(CompiledNode),
}

impl CompiledFilter {
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn into_node(self) -> Option<CompiledNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Empty | Self::Invalid => None,
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&CompiledNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Empty | Self::Invalid => None,
        }
    }
}

impl From<CompiledNode> for CompiledFilter {
    fn from(node: CompiledNode) -> Self {
        Self::Node(node)
    }
}

///
/// CompiledNode
///
/// One predicate in the target grammar. The downstream per-version adapter
/// maps this tagged tree mechanically to wire XML.
///

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledNode {
    Comparison(ComparisonNode),
    Id(IdSet),
    Logical(LogicalNode),
    Spatial(SpatialNode),
    Temporal(TemporalNode),
}

///
/// ComparisonNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComparisonNode {
    Between {
        property: String,
        lower: String,
        upper: String,
    },
    Binary {
        op: ComparisonOp,
        property: String,
        literal: String,
    },
    Like {
        property: String,
        pattern: String,
        wildcard: char,
        single_char: char,
        escape: char,
    },
}

///
/// SpatialNode
///
/// `distance_meters` is carried only by DWithin and Beyond.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SpatialNode {
    pub op: SpatialOp,
    pub property: String,
    pub geometry: EncodedGeometry,
    pub distance_meters: Option<f64>,
}

///
/// EncodedGeometry
///
/// A geometry paired with the server-supported encoding the codec selected
/// for it and the SRS it is expressed in.
///

#[derive(Clone, Debug, PartialEq)]
pub struct EncodedGeometry {
    pub geometry: Geometry,
    pub encoding: GeometryOperand,
    pub srs: String,
}

///
/// TemporalNode
///
/// `Period` bounds record whether they were defaulted during the
/// After/Before → During reconstruction, so the combinator stage can merge a
/// sibling supplying the real bound.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemporalNode {
    Instant {
        op: TemporalOp,
        property: String,
        at: String,
    },
    Period {
        property: String,
        begin: TimeBound,
        end: TimeBound,
    },
}

impl TemporalNode {
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Instant { property, .. } | Self::Period { property, .. } => property,
        }
    }
}

///
/// TimeBound
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeBound {
    /// ISO-8601 UTC instant, second precision.
    pub at: String,
    /// True when the bound was filled in with "now" rather than supplied.
    pub defaulted: bool,
}

impl TimeBound {
    #[must_use]
    pub const fn actual(at: String) -> Self {
        Self {
            at,
            defaulted: false,
        }
    }

    #[must_use]
    pub const fn defaulted_to(at: String) -> Self {
        Self { at, defaulted: true }
    }
}

///
/// LogicalNode
///
/// `And`/`Or` children are real predicates: sentinels never survive the
/// combinator (Invalid poisons, Empty is pruned). `Not` may wrap Empty —
/// `not(Empty)` wraps rather than absorbs, a preserved quirk — but never
/// Invalid, which passes through unchanged.
///

#[derive(Clone, Debug, PartialEq)]
pub enum LogicalNode {
    And(Vec<CompiledNode>),
    Not(Box<CompiledFilter>),
    Or(Vec<CompiledNode>),
}

///
/// IdSet
///
/// Deduplicated, deterministically ordered feature ids. `and` and `or` of id
/// predicates both collapse to the union of these sets.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct IdSet(BTreeSet<String>);

impl IdSet {
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

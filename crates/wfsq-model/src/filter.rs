use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

///
/// Abstract Filter AST
///
/// Pure, protocol-agnostic representation of federation queries. This layer
/// contains no capability checks, operator fallbacks, or wire encodings.
/// All interpretation occurs in the `wfsq-core` passes:
///
/// - attribute resolution
/// - predicate compilation (capability-gated lowering)
/// - combinator rewriting
/// - query planning
///

/// Wildcard property matching every textual queryable of a feature type.
pub const ANY_TEXT: &str = "anyText";

/// Wildcard property matching every geometry queryable of a feature type.
pub const ANY_GEOMETRY: &str = "anyGeo";

/// Reserved identifier property; literals take the `featureType.localId` form.
pub const IDENTIFIER: &str = "id";

/// Content-type pseudo-property, resolved by an external routing step.
pub const CONTENT_TYPE: &str = "contentType";

///
/// PropertyRef
///
/// A requested property: a concrete server name, one of the two wildcard
/// markers, the reserved identifier, or the content-type pseudo-property.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PropertyRef {
    AnyGeometry,
    AnyText,
    ContentType,
    Identifier,
    Named(String),
}

impl PropertyRef {
    /// Interpret a requested property name, recognizing the reserved markers.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            ANY_TEXT => Self::AnyText,
            ANY_GEOMETRY => Self::AnyGeometry,
            IDENTIFIER => Self::Identifier,
            CONTENT_TYPE => Self::ContentType,
            other => Self::Named(other.to_string()),
        }
    }

    /// The requested name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AnyGeometry => ANY_GEOMETRY,
            Self::AnyText => ANY_TEXT,
            Self::ContentType => CONTENT_TYPE,
            Self::Identifier => IDENTIFIER,
            Self::Named(name) => name,
        }
    }
}

///
/// ComparisonOp
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum ComparisonOp {
    Between,
    EqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Like,
    NotEqualTo,
}

impl ComparisonOp {
    /// Map a capability-document operator name to an operator.
    ///
    /// Accepts both the bare form (`EqualTo`) and the qualified Filter
    /// Encoding form (`PropertyIsEqualTo`). Unknown names map to `None`.
    /// The WFS 1.0 aggregate `Simple_Comparisons` token is expanded by the
    /// capability builder, not here.
    #[must_use]
    pub fn from_capability_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("PropertyIs").unwrap_or(name);

        match bare {
            "Between" => Some(Self::Between),
            "EqualTo" => Some(Self::EqualTo),
            "GreaterThan" => Some(Self::GreaterThan),
            "GreaterThanOrEqualTo" => Some(Self::GreaterThanOrEqualTo),
            "LessThan" => Some(Self::LessThan),
            "LessThanOrEqualTo" => Some(Self::LessThanOrEqualTo),
            "Like" => Some(Self::Like),
            "NotEqualTo" => Some(Self::NotEqualTo),
            _ => None,
        }
    }

    /// The operators covered by the WFS 1.0 `Simple_Comparisons` aggregate.
    #[must_use]
    pub const fn simple_comparisons() -> [Self; 6] {
        [
            Self::EqualTo,
            Self::NotEqualTo,
            Self::LessThan,
            Self::LessThanOrEqualTo,
            Self::GreaterThan,
            Self::GreaterThanOrEqualTo,
        ]
    }
}

///
/// SpatialOp
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum SpatialOp {
    BBox,
    Beyond,
    Contains,
    Crosses,
    DWithin,
    Disjoint,
    Intersects,
    Overlaps,
    Touches,
    Within,
}

impl SpatialOp {
    /// Map a capability-document operator name to an operator.
    #[must_use]
    pub fn from_capability_name(name: &str) -> Option<Self> {
        match name {
            "BBOX" => Some(Self::BBox),
            "Beyond" => Some(Self::Beyond),
            "Contains" => Some(Self::Contains),
            "Crosses" => Some(Self::Crosses),
            "DWithin" => Some(Self::DWithin),
            "Disjoint" => Some(Self::Disjoint),
            "Intersect" | "Intersects" => Some(Self::Intersects),
            "Overlaps" => Some(Self::Overlaps),
            "Touches" => Some(Self::Touches),
            "Within" => Some(Self::Within),
            _ => None,
        }
    }
}

///
/// TemporalOp
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum TemporalOp {
    After,
    Before,
    During,
}

impl TemporalOp {
    /// Map a capability-document operator name to an operator.
    #[must_use]
    pub fn from_capability_name(name: &str) -> Option<Self> {
        match name {
            "After" | "TM_After" => Some(Self::After),
            "Before" | "TM_Before" => Some(Self::Before),
            "During" | "TM_During" => Some(Self::During),
            _ => None,
        }
    }
}

///
/// Literal
///
/// Typed comparison operand. Wire formatting (including date normalization
/// for temporal properties) happens during compilation.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Literal {
    Boolean(bool),
    Decimal(f64),
    Integer(i64),
    Text(String),
}

impl Literal {
    /// True for a text literal with no content.
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// Borrow the text content, if this is a text literal.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

///
/// ComparisonOperand
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ComparisonOperand {
    Bounds { lower: Literal, upper: Literal },
    Literal(Literal),
}

///
/// ComparisonFilter
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ComparisonFilter {
    pub op: ComparisonOp,
    pub property: PropertyRef,
    pub operand: ComparisonOperand,
}

///
/// SpatialFilter
///
/// Geometry is carried as WKT; parsing and encoding selection happen in the
/// geometry codec. `distance_meters` applies to DWithin and Beyond only.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SpatialFilter {
    pub op: SpatialOp,
    pub property: PropertyRef,
    pub wkt: String,
    pub distance_meters: Option<f64>,
}

///
/// TemporalValue
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TemporalValue {
    Instant(String),
    Range { begin: String, end: String },
}

///
/// TemporalFilter
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TemporalFilter {
    pub op: TemporalOp,
    pub property: PropertyRef,
    pub value: TemporalValue,
}

///
/// Filter
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Filter {
    And(Vec<Self>),
    Comparison(ComparisonFilter),
    FeatureId(Vec<String>),
    Not(Box<Self>),
    Or(Vec<Self>),
    Spatial(SpatialFilter),
    Temporal(TemporalFilter),
}

impl Filter {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    #[must_use]
    pub fn comparison(op: ComparisonOp, property: &str, literal: impl Into<Literal>) -> Self {
        Self::Comparison(ComparisonFilter {
            op,
            property: PropertyRef::parse(property),
            operand: ComparisonOperand::Literal(literal.into()),
        })
    }

    #[must_use]
    pub fn eq(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::EqualTo, property, literal)
    }

    #[must_use]
    pub fn ne(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::NotEqualTo, property, literal)
    }

    #[must_use]
    pub fn lt(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::LessThan, property, literal)
    }

    #[must_use]
    pub fn lte(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::LessThanOrEqualTo, property, literal)
    }

    #[must_use]
    pub fn gt(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::GreaterThan, property, literal)
    }

    #[must_use]
    pub fn gte(property: &str, literal: impl Into<Literal>) -> Self {
        Self::comparison(ComparisonOp::GreaterThanOrEqualTo, property, literal)
    }

    #[must_use]
    pub fn like(property: &str, pattern: &str) -> Self {
        Self::comparison(ComparisonOp::Like, property, pattern)
    }

    #[must_use]
    pub fn between(property: &str, lower: impl Into<Literal>, upper: impl Into<Literal>) -> Self {
        Self::Comparison(ComparisonFilter {
            op: ComparisonOp::Between,
            property: PropertyRef::parse(property),
            operand: ComparisonOperand::Bounds {
                lower: lower.into(),
                upper: upper.into(),
            },
        })
    }

    #[must_use]
    pub fn spatial(op: SpatialOp, property: &str, wkt: &str) -> Self {
        Self::Spatial(SpatialFilter {
            op,
            property: PropertyRef::parse(property),
            wkt: wkt.to_string(),
            distance_meters: None,
        })
    }

    #[must_use]
    pub fn intersects(property: &str, wkt: &str) -> Self {
        Self::spatial(SpatialOp::Intersects, property, wkt)
    }

    #[must_use]
    pub fn dwithin(property: &str, wkt: &str, distance_meters: f64) -> Self {
        Self::Spatial(SpatialFilter {
            op: SpatialOp::DWithin,
            property: PropertyRef::parse(property),
            wkt: wkt.to_string(),
            distance_meters: Some(distance_meters),
        })
    }

    #[must_use]
    pub fn beyond(property: &str, wkt: &str, distance_meters: f64) -> Self {
        Self::Spatial(SpatialFilter {
            op: SpatialOp::Beyond,
            property: PropertyRef::parse(property),
            wkt: wkt.to_string(),
            distance_meters: Some(distance_meters),
        })
    }

    #[must_use]
    pub fn after(property: &str, instant: &str) -> Self {
        Self::Temporal(TemporalFilter {
            op: TemporalOp::After,
            property: PropertyRef::parse(property),
            value: TemporalValue::Instant(instant.to_string()),
        })
    }

    #[must_use]
    pub fn before(property: &str, instant: &str) -> Self {
        Self::Temporal(TemporalFilter {
            op: TemporalOp::Before,
            property: PropertyRef::parse(property),
            value: TemporalValue::Instant(instant.to_string()),
        })
    }

    #[must_use]
    pub fn during(property: &str, begin: &str, end: &str) -> Self {
        Self::Temporal(TemporalFilter {
            op: TemporalOp::During,
            property: PropertyRef::parse(property),
            value: TemporalValue::Range {
                begin: begin.to_string(),
                end: end.to_string(),
            },
        })
    }

    #[must_use]
    pub fn feature_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FeatureId(ids.into_iter().map(Into::into).collect())
    }
}

impl BitAnd for Filter {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Filter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_parse_recognizes_reserved_markers() {
        assert_eq!(PropertyRef::parse("anyText"), PropertyRef::AnyText);
        assert_eq!(PropertyRef::parse("anyGeo"), PropertyRef::AnyGeometry);
        assert_eq!(PropertyRef::parse("id"), PropertyRef::Identifier);
        assert_eq!(PropertyRef::parse("contentType"), PropertyRef::ContentType);
        assert_eq!(
            PropertyRef::parse("title"),
            PropertyRef::Named("title".to_string())
        );
    }

    #[test]
    fn capability_names_accept_qualified_and_bare_forms() {
        assert_eq!(
            ComparisonOp::from_capability_name("PropertyIsEqualTo"),
            Some(ComparisonOp::EqualTo)
        );
        assert_eq!(
            ComparisonOp::from_capability_name("Like"),
            Some(ComparisonOp::Like)
        );
        assert_eq!(ComparisonOp::from_capability_name("Fancy"), None);
        assert_eq!(
            SpatialOp::from_capability_name("BBOX"),
            Some(SpatialOp::BBox)
        );
        assert_eq!(
            SpatialOp::from_capability_name("Intersect"),
            Some(SpatialOp::Intersects)
        );
        assert_eq!(
            TemporalOp::from_capability_name("TM_During"),
            Some(TemporalOp::During)
        );
    }

    #[test]
    fn bit_ops_build_logical_nodes() {
        let combined = Filter::eq("title", "a") & Filter::eq("title", "b");
        assert!(matches!(combined, Filter::And(children) if children.len() == 2));

        let either = Filter::eq("title", "a") | Filter::eq("title", "b");
        assert!(matches!(either, Filter::Or(children) if children.len() == 2));
    }
}

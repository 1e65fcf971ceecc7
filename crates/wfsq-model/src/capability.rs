use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// CapabilityDocument
///
/// The consumed advertisement carrier: operator name lists per category,
/// operand name lists, and the sort section. Discovery parses the server's
/// GetCapabilities response into this shape; the engine never sees XML.
///
/// Absent sections default to empty — a server that advertises nothing for a
/// subsystem simply gets an empty set in the built capability model.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct CapabilityDocument {
    pub comparison_operators: Vec<String>,
    pub spatial_operators: Vec<SpatialOperator>,
    pub temporal_operators: Vec<TemporalOperator>,
    pub geometry_operands: Vec<String>,
    pub temporal_operands: Vec<String>,
    pub logical_operators: bool,
    pub sort: Option<SortCapability>,
}

///
/// SpatialOperator
///
/// One advertised spatial operator; `operands` optionally narrows the
/// geometry operands accepted by this operator specifically.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SpatialOperator {
    pub name: String,
    pub operands: Vec<String>,
}

impl SpatialOperator {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
        }
    }
}

///
/// TemporalOperator
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TemporalOperator {
    pub name: String,
    pub operands: Vec<String>,
}

impl TemporalOperator {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
        }
    }
}

///
/// SortCapability
///
/// Present when the server advertises sorting at all. An empty
/// `allowed_orders` list means the server did not enumerate directions.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SortCapability {
    pub allowed_orders: Vec<String>,
}

///
/// SortOrder
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Map a capability-document direction token to an order.
    #[must_use]
    pub fn from_capability_name(name: &str) -> Option<Self> {
        match name {
            "ASC" | "ASC!" | "Ascending" => Some(Self::Ascending),
            "DESC" | "DESC!" | "Descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sections_deserialize_to_empty_sets() {
        let doc: CapabilityDocument = serde_json::from_str("{}").expect("empty document");

        assert!(doc.comparison_operators.is_empty());
        assert!(doc.spatial_operators.is_empty());
        assert!(doc.temporal_operators.is_empty());
        assert!(!doc.logical_operators);
        assert!(doc.sort.is_none());
    }

    #[test]
    fn sort_section_with_no_orders_deserializes_present_but_unconstrained() {
        let doc: CapabilityDocument =
            serde_json::from_str(r#"{"sort": {}}"#).expect("sort document");

        let sort = doc.sort.expect("sort section present");
        assert!(sort.allowed_orders.is_empty());
    }

    #[test]
    fn sort_order_tokens_cover_both_wire_spellings() {
        assert_eq!(
            SortOrder::from_capability_name("ASC"),
            Some(SortOrder::Ascending)
        );
        assert_eq!(
            SortOrder::from_capability_name("DESC!"),
            Some(SortOrder::Descending)
        );
        assert_eq!(SortOrder::from_capability_name("SIDEWAYS"), None);
    }
}

//! Query/pagination planner: turns compiled filters plus paging inputs into
//! per-feature-type protocol queries, and reconciles raw responses into the
//! requested window.
//!
//! Plans are plain values built per query and discarded after execution; the
//! planner holds no state and performs no I/O.

pub(crate) mod window;

pub use window::{PageResult, PageWindow, Paged};

use crate::{
    capability::Capabilities,
    compile::{CompiledFilter, CompiledNode},
    config::SourceConfig,
};
use thiserror::Error as ThisError;
use tracing::debug;
use wfsq_model::capability::SortOrder;

///
/// PlanError
///
/// The unsupported-query surface: either the paging inputs are unusable, or
/// every feature type's filter compiled to Invalid.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum PlanError {
    #[error("no feature type accepts this filter; the query is not supported by this source")]
    NoViableFeatureType,

    #[error("start index must be positive (1-based), got {start_index}")]
    StartIndex { start_index: i64 },
}

///
/// SortSpec
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortSpec {
    pub property: String,
    pub order: SortOrder,
}

///
/// SubQuery
///
/// One protocol query against one feature type. `filter: None` is an
/// unconstrained query (the Empty sentinel); Invalid filters never reach
/// this type.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SubQuery {
    pub feature_type: String,
    pub filter: Option<CompiledNode>,
    pub sort: Option<SortSpec>,
}

///
/// QueryPlan
///

#[derive(Clone, Debug, PartialEq)]
pub struct QueryPlan {
    pub queries: Vec<SubQuery>,
    pub window: PageWindow,
}

///
/// QueryPlanner
///

#[derive(Clone, Copy, Debug)]
pub struct QueryPlanner<'a> {
    caps: &'a Capabilities,
    config: &'a SourceConfig,
}

impl<'a> QueryPlanner<'a> {
    #[must_use]
    pub const fn new(caps: &'a Capabilities, config: &'a SourceConfig) -> Self {
        Self { caps, config }
    }

    /// Plan one windowed query over a batch of per-feature-type filters.
    ///
    /// `start_index` is 1-based; anything below 1 is a hard error. A
    /// non-positive `page_size` is clamped to the configured maximum, not an
    /// error. A feature type whose filter is Invalid is excluded from the
    /// batch; when every type is excluded the query as a whole fails.
    pub fn plan(
        &self,
        filters: Vec<(String, CompiledFilter)>,
        sort: Option<SortSpec>,
        page_size: i64,
        start_index: i64,
    ) -> Result<QueryPlan, PlanError> {
        if start_index < 1 {
            return Err(PlanError::StartIndex { start_index });
        }
        #[allow(clippy::cast_sign_loss)]
        let window = PageWindow::new(self.config, page_size, start_index as u64);

        let sort = self.gate_sort(sort);

        let mut queries = Vec::with_capacity(filters.len());
        for (feature_type, filter) in filters {
            match filter {
                CompiledFilter::Invalid => {
                    debug!(%feature_type, "filter not representable; type excluded");
                }
                CompiledFilter::Empty => queries.push(SubQuery {
                    feature_type,
                    filter: None,
                    sort: sort.clone(),
                }),
                CompiledFilter::Node(node) => queries.push(SubQuery {
                    feature_type,
                    filter: Some(node),
                    sort: sort.clone(),
                }),
            }
        }

        if queries.is_empty() {
            return Err(PlanError::NoViableFeatureType);
        }

        Ok(QueryPlan { queries, window })
    }

    // Sorting is attempted only when advertised. An order the server is
    // known to disallow drops the sort silently; with no enumerated orders
    // we attempt optimistically.
    fn gate_sort(&self, sort: Option<SortSpec>) -> Option<SortSpec> {
        let sort = sort?;

        if !self.caps.sorting_supported() {
            debug!(property = %sort.property, "sorting not advertised; proceeding unsorted");
            return None;
        }
        if !self.caps.sort_order_allowed(sort.order) {
            debug!(
                property = %sort.property,
                order = %sort.order,
                "sort order disallowed; proceeding unsorted",
            );
            return None;
        }

        Some(sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{ComparisonNode, CompiledNode};
    use wfsq_model::{
        capability::{CapabilityDocument, SortCapability},
        filter::ComparisonOp,
    };

    fn caps(sort: Option<SortCapability>) -> Capabilities {
        Capabilities::build(&CapabilityDocument {
            sort,
            ..CapabilityDocument::default()
        })
    }

    fn node() -> CompiledNode {
        CompiledNode::Comparison(ComparisonNode::Binary {
            op: ComparisonOp::EqualTo,
            property: "title".to_string(),
            literal: "x".to_string(),
        })
    }

    fn sort_spec() -> SortSpec {
        SortSpec {
            property: "title".to_string(),
            order: SortOrder::Descending,
        }
    }

    #[test]
    fn non_positive_start_index_is_a_hard_error() {
        let caps = caps(None);
        let config = SourceConfig::default();
        let planner = QueryPlanner::new(&caps, &config);

        for start_index in [0, -1] {
            assert_eq!(
                planner.plan(
                    vec![("topp:roads".to_string(), CompiledFilter::Empty)],
                    None,
                    10,
                    start_index,
                ),
                Err(PlanError::StartIndex { start_index })
            );
        }
    }

    #[test]
    fn invalid_types_are_excluded_and_an_empty_batch_fails() {
        let caps = caps(None);
        let config = SourceConfig::default();
        let planner = QueryPlanner::new(&caps, &config);

        let plan = planner
            .plan(
                vec![
                    ("topp:roads".to_string(), CompiledFilter::Node(node())),
                    ("topp:rivers".to_string(), CompiledFilter::Invalid),
                ],
                None,
                10,
                1,
            )
            .expect("one viable type remains");
        assert_eq!(plan.queries.len(), 1);
        assert_eq!(plan.queries[0].feature_type, "topp:roads");

        assert_eq!(
            planner.plan(
                vec![("topp:rivers".to_string(), CompiledFilter::Invalid)],
                None,
                10,
                1,
            ),
            Err(PlanError::NoViableFeatureType)
        );
    }

    #[test]
    fn empty_filters_plan_as_unconstrained_queries() {
        let caps = caps(None);
        let config = SourceConfig::default();
        let planner = QueryPlanner::new(&caps, &config);

        let plan = planner
            .plan(
                vec![("topp:roads".to_string(), CompiledFilter::Empty)],
                None,
                10,
                1,
            )
            .expect("empty filter plans");
        assert_eq!(plan.queries[0].filter, None);
    }

    #[test]
    fn sort_is_dropped_silently_when_not_advertised_or_disallowed() {
        let config = SourceConfig::default();

        let unsupported = caps(None);
        let planner = QueryPlanner::new(&unsupported, &config);
        let plan = planner
            .plan(
                vec![("topp:roads".to_string(), CompiledFilter::Empty)],
                Some(sort_spec()),
                10,
                1,
            )
            .expect("plans unsorted");
        assert_eq!(plan.queries[0].sort, None);

        let ascending_only = caps(Some(SortCapability {
            allowed_orders: vec!["ASC".to_string()],
        }));
        let planner = QueryPlanner::new(&ascending_only, &config);
        let plan = planner
            .plan(
                vec![("topp:roads".to_string(), CompiledFilter::Empty)],
                Some(sort_spec()),
                10,
                1,
            )
            .expect("plans unsorted");
        assert_eq!(plan.queries[0].sort, None);
    }

    #[test]
    fn sort_is_attempted_optimistically_without_an_enumerated_order_set() {
        let config = SourceConfig::default();
        let unconstrained = caps(Some(SortCapability::default()));
        let planner = QueryPlanner::new(&unconstrained, &config);

        let plan = planner
            .plan(
                vec![("topp:roads".to_string(), CompiledFilter::Empty)],
                Some(sort_spec()),
                10,
                1,
            )
            .expect("plans sorted");
        assert_eq!(plan.queries[0].sort, Some(sort_spec()));
    }
}

//! End-to-end translation: capability document → compile → plan → window.

use time::macros::datetime;
use wfsq_core::{
    capability::Capabilities,
    compile::{CompiledFilter, CompiledNode, FilterCompiler, LogicalNode},
    config::SourceConfig,
    plan::{PageResult, QueryPlanner, SortSpec},
};
use wfsq_model::{
    capability::{CapabilityDocument, SortCapability, SpatialOperator, TemporalOperator},
    filter::Filter,
    schema::{FeatureSchema, PropertyKind},
    version::WfsVersion,
};

fn document() -> CapabilityDocument {
    CapabilityDocument {
        comparison_operators: vec!["Simple_Comparisons".to_string(), "Like".to_string()],
        spatial_operators: vec![
            SpatialOperator::named("BBOX"),
            SpatialOperator::named("Intersects"),
        ],
        temporal_operators: vec![TemporalOperator::named("During")],
        geometry_operands: vec![
            "gml:Envelope".to_string(),
            "gml:Point".to_string(),
            "gml:Polygon".to_string(),
        ],
        temporal_operands: vec!["gml:TimePeriod".to_string()],
        logical_operators: true,
        sort: Some(SortCapability {
            allowed_orders: vec!["ASC".to_string(), "DESC".to_string()],
        }),
    }
}

fn roads() -> FeatureSchema {
    FeatureSchema::new("topp:roads", "urn:ogc:def:crs:EPSG::4326")
        .with_property("title", PropertyKind::Text, true)
        .with_property("geom", PropertyKind::Geometry, true)
        .with_property("modified", PropertyKind::Temporal, true)
}

fn rivers() -> FeatureSchema {
    // no geometry queryable at all
    FeatureSchema::new("topp:rivers", "urn:ogc:def:crs:EPSG::4326")
        .with_property("title", PropertyKind::Text, true)
}

#[test]
fn a_compound_query_translates_plans_and_windows() {
    let caps = Capabilities::build(&document());
    let config = SourceConfig::for_version(WfsVersion::V1_0_0);
    let now = datetime!(2026-08-06 12:00:00 UTC);

    let filter = Filter::and(vec![
        Filter::like("title", "main*"),
        Filter::intersects("anyGeo", "POINT (10 20)"),
        Filter::after("modified", "2024-01-01T00:00:00Z"),
    ]);

    // roads can express everything; rivers has no geometry property, so its
    // branch compiles to Invalid and the type drops out of the batch
    let roads_schema = roads();
    let rivers_schema = rivers();
    let roads_filter = FilterCompiler::new(&caps, &roads_schema, &config, now)
        .compile(&filter)
        .expect("roads filter compiles");
    let rivers_filter = FilterCompiler::new(&caps, &rivers_schema, &config, now)
        .compile(&filter)
        .expect("rivers filter compiles");

    assert!(matches!(
        roads_filter,
        CompiledFilter::Node(CompiledNode::Logical(LogicalNode::And(_)))
    ));
    assert_eq!(rivers_filter, CompiledFilter::Invalid);

    let planner = QueryPlanner::new(&caps, &config);
    let plan = planner
        .plan(
            vec![
                ("topp:roads".to_string(), roads_filter),
                ("topp:rivers".to_string(), rivers_filter),
            ],
            Some(SortSpec {
                property: "modified".to_string(),
                order: wfsq_model::capability::SortOrder::Descending,
            }),
            4,
            2,
        )
        .expect("plan builds");

    assert_eq!(plan.queries.len(), 1);
    assert_eq!(plan.queries[0].feature_type, "topp:roads");
    assert!(plan.queries[0].sort.is_some());

    // 1.0 has no native offset: over-fetch from zero, slice client-side
    assert_eq!(plan.window.native_offset(), None);
    assert_eq!(plan.window.request_count(), 8);

    let records: Vec<u32> = (1..=8).collect();
    let paged = plan.window.window(PageResult::new(records, Some(10)));
    assert_eq!(paged.results, [2, 3, 4, 5]);
    assert_eq!(paged.hits, 10);
}

#[test]
fn a_native_offset_source_passes_the_window_through() {
    let caps = Capabilities::build(&document());
    let config = SourceConfig::for_version(WfsVersion::V2_0_0);
    let now = datetime!(2026-08-06 12:00:00 UTC);

    let schema = roads();
    let compiled = FilterCompiler::new(&caps, &schema, &config, now)
        .compile(&Filter::eq("title", "main st"))
        .expect("filter compiles");

    let planner = QueryPlanner::new(&caps, &config);
    let plan = planner
        .plan(vec![("topp:roads".to_string(), compiled)], None, 5, 11)
        .expect("plan builds");

    assert_eq!(plan.window.native_offset(), Some(10));
    assert_eq!(plan.window.request_count(), 5);

    let paged = plan.window.window(PageResult::new(vec![11, 12, 13], None));
    assert_eq!(paged.results, [11, 12, 13]);
    assert_eq!(paged.hits, 3);
}

//! Attribute resolver: maps a requested property reference to the concrete
//! queryable server properties it addresses.
//!
//! The resolver returns its verdict directly as a value; nothing here keeps
//! state between calls.

use thiserror::Error as ThisError;
use wfsq_model::{
    filter::PropertyRef,
    schema::{FeatureSchema, PropertyKind},
};

///
/// Resolution
///
/// - `Concrete` — an ordinary, indexed property.
/// - `Expanded` — wildcard expansion to every queryable property of the
///   requested kind, in discovery order; may be empty (all blacklisted or
///   none exist), which is a capability gap, not an error.
/// - `Identifier` — the reserved identifier property; literal handling
///   happens in the comparison compiler.
/// - `ContentType` — the content-type pseudo-property, resolved by an
///   external routing step; compiles to the Empty sentinel.
/// - `Unknown` — no such property on this feature type; compiles to the
///   Invalid sentinel so one multi-type query can drop the branch silently.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    Concrete(String),
    ContentType,
    Expanded(Vec<String>),
    Identifier,
    Unknown,
}

///
/// ResolveError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    /// The caller explicitly named a property the server declares
    /// non-indexed; a hard failure rather than a silent drop.
    #[error("property '{property}' exists but is not queryable on this source")]
    Unqueryable { property: String },
}

/// Resolve a property reference against one feature type's schema.
pub fn resolve(schema: &FeatureSchema, property: &PropertyRef) -> Result<Resolution, ResolveError> {
    match property {
        PropertyRef::AnyText => Ok(Resolution::Expanded(expand(schema, PropertyKind::Text))),
        PropertyRef::AnyGeometry => Ok(Resolution::Expanded(expand(schema, PropertyKind::Geometry))),
        PropertyRef::Identifier => Ok(Resolution::Identifier),
        PropertyRef::ContentType => Ok(Resolution::ContentType),
        PropertyRef::Named(name) => match schema.property(name) {
            Some(descriptor) if descriptor.indexed => Ok(Resolution::Concrete(name.clone())),
            Some(_) => Err(ResolveError::Unqueryable {
                property: name.clone(),
            }),
            None => Ok(Resolution::Unknown),
        },
    }
}

// Wildcard expansion keeps discovery order and silently skips non-indexed
// properties; an empty result is the caller's Invalid, not our error.
fn expand(schema: &FeatureSchema, kind: PropertyKind) -> Vec<String> {
    schema
        .properties_of_kind(kind)
        .filter(|descriptor| descriptor.indexed)
        .map(|descriptor| descriptor.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new("topp:roads", "urn:ogc:def:crs:EPSG::4326")
            .with_property("name", PropertyKind::Text, true)
            .with_property("surface", PropertyKind::Text, false)
            .with_property("label", PropertyKind::Text, true)
            .with_property("geom", PropertyKind::Geometry, true)
    }

    #[test]
    fn named_indexed_property_resolves_concrete() {
        assert_eq!(
            resolve(&schema(), &PropertyRef::Named("name".to_string())),
            Ok(Resolution::Concrete("name".to_string()))
        );
    }

    #[test]
    fn named_unindexed_property_is_a_hard_error() {
        assert_eq!(
            resolve(&schema(), &PropertyRef::Named("surface".to_string())),
            Err(ResolveError::Unqueryable {
                property: "surface".to_string()
            })
        );
    }

    #[test]
    fn unknown_property_resolves_unknown_not_error() {
        assert_eq!(
            resolve(&schema(), &PropertyRef::Named("missing".to_string())),
            Ok(Resolution::Unknown)
        );
    }

    #[test]
    fn any_text_expands_indexed_textuals_in_discovery_order() {
        assert_eq!(
            resolve(&schema(), &PropertyRef::AnyText),
            Ok(Resolution::Expanded(vec![
                "name".to_string(),
                "label".to_string()
            ]))
        );
    }

    #[test]
    fn any_geometry_expansion_may_be_empty() {
        let bare = FeatureSchema::new("topp:bare", "EPSG:4326");
        assert_eq!(
            resolve(&bare, &PropertyRef::AnyGeometry),
            Ok(Resolution::Expanded(vec![]))
        );
    }
}

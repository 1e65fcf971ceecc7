use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// FeatureSchema
///
/// Read-only description of one WFS feature type, produced by the discovery
/// collaborator. The engine only consumes it: property lookup, kind-filtered
/// expansion in discovery order, and the indexed (queryable) flag.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FeatureSchema {
    type_name: String,
    declared_srs: String,
    properties: Vec<PropertyDescriptor>,
}

impl FeatureSchema {
    /// Create a schema with no properties.
    #[must_use]
    pub fn new(type_name: impl Into<String>, declared_srs: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            declared_srs: declared_srs.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property in discovery order.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, kind: PropertyKind, indexed: bool) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            kind,
            indexed,
        });
        self
    }

    /// Qualified feature type name, e.g. `ns:Roads`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Local part of the feature type name (after the namespace prefix).
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.type_name
            .split_once(':')
            .map_or(self.type_name.as_str(), |(_, local)| local)
    }

    /// Declared SRS of the feature type, e.g. `urn:ogc:def:crs:EPSG::4326`.
    #[must_use]
    pub fn declared_srs(&self) -> &str {
        &self.declared_srs
    }

    /// Look up a property by server name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// True when the property exists and is flagged indexed.
    #[must_use]
    pub fn is_indexed(&self, name: &str) -> bool {
        self.property(name).is_some_and(|prop| prop.indexed)
    }

    /// All properties, in discovery order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }

    /// Properties of one kind, in discovery order.
    pub fn properties_of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(move |prop| prop.kind == kind)
    }
}

///
/// PropertyDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    pub indexed: bool,
}

///
/// PropertyKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum PropertyKind {
    Geometry,
    Other,
    Temporal,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roads() -> FeatureSchema {
        FeatureSchema::new("topp:roads", "urn:ogc:def:crs:EPSG::4326")
            .with_property("name", PropertyKind::Text, true)
            .with_property("surface", PropertyKind::Text, false)
            .with_property("geom", PropertyKind::Geometry, true)
            .with_property("built", PropertyKind::Temporal, true)
    }

    #[test]
    fn local_name_strips_the_namespace_prefix() {
        assert_eq!(roads().local_name(), "roads");
        assert_eq!(
            FeatureSchema::new("roads", "EPSG:4326").local_name(),
            "roads"
        );
    }

    #[test]
    fn kind_filtered_views_preserve_discovery_order() {
        let schema = roads();
        let textual: Vec<_> = schema
            .properties_of_kind(PropertyKind::Text)
            .map(|prop| prop.name.as_str())
            .collect();

        assert_eq!(textual, ["name", "surface"]);
    }

    #[test]
    fn is_indexed_is_false_for_unknown_and_unindexed_properties() {
        let schema = roads();
        assert!(schema.is_indexed("name"));
        assert!(!schema.is_indexed("surface"));
        assert!(!schema.is_indexed("nope"));
    }
}

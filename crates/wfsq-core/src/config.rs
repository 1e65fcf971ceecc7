use serde::{Deserialize, Serialize};
use wfsq_model::version::{AxisOrder, WfsVersion};

///
/// SourceConfig
///
/// Per-source translation settings, supplied by the caller alongside the
/// capability/schema snapshot. Plain value data; no file format and no
/// global state belong to this engine.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Target protocol generation.
    pub version: WfsVersion,

    /// Maximum features one protocol request may return; also the clamp
    /// value for non-positive page sizes.
    pub max_features: u32,

    /// Over-fetch multiplier for offset emulation on generations without a
    /// native start index.
    pub overfetch_multiplier: u32,

    /// Per-server axis order override; `None` follows the generation default.
    pub axis_order: Option<AxisOrder>,

    /// Wildcard characters carried into compiled Like predicates.
    pub like: LikeSpec,
}

impl SourceConfig {
    /// Configuration for a protocol generation with stock settings.
    #[must_use]
    pub fn for_version(version: WfsVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// The axis order in effect: the override, or the generation default.
    #[must_use]
    pub fn effective_axis_order(&self) -> AxisOrder {
        self.axis_order
            .unwrap_or_else(|| self.version.default_axis_order())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            version: WfsVersion::V2_0_0,
            max_features: 1000,
            overfetch_multiplier: 2,
            axis_order: None,
            like: LikeSpec::default(),
        }
    }
}

///
/// LikeSpec
///
/// Wildcard vocabulary for Like predicates. The abstract pattern language
/// uses these characters; the compiled node repeats them so the wire mapper
/// can declare them on the emitted element.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct LikeSpec {
    pub wildcard: char,
    pub single_char: char,
    pub escape: char,
}

impl Default for LikeSpec {
    fn default() -> Self {
        Self {
            wildcard: '*',
            single_char: '?',
            escape: '\\',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_order_override_wins_over_the_generation_default() {
        let mut config = SourceConfig::for_version(WfsVersion::V1_1_0);
        assert_eq!(config.effective_axis_order(), AxisOrder::LatLon);

        config.axis_order = Some(AxisOrder::LonLat);
        assert_eq!(config.effective_axis_order(), AxisOrder::LonLat);
    }

    #[test]
    fn defaults_deserialize_from_an_empty_document() {
        let config: SourceConfig = serde_json::from_str("{}").expect("empty config");

        assert_eq!(config.version, WfsVersion::V2_0_0);
        assert_eq!(config.max_features, 1000);
        assert_eq!(config.overfetch_multiplier, 2);
        assert_eq!(config.like.wildcard, '*');
    }
}

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// WfsVersion
///
/// The three WFS protocol generations this engine translates for. The
/// generation decides two wire-level defaults: whether the protocol carries a
/// native result offset, and which axis order coordinate pairs use.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum WfsVersion {
    #[display("1.0.0")]
    V1_0_0,
    #[display("1.1.0")]
    V1_1_0,
    #[display("2.0.0")]
    V2_0_0,
}

impl WfsVersion {
    /// True when the protocol accepts a native result offset (`startIndex`).
    ///
    /// Earlier generations always page from index zero; the planner emulates
    /// the offset client-side for them.
    #[must_use]
    pub const fn native_offset(self) -> bool {
        matches!(self, Self::V2_0_0)
    }

    /// Default coordinate axis order for the generation.
    ///
    /// WFS 1.0 uses x/y (lon/lat); 1.1 and 2.0 follow the EPSG urn form
    /// (lat/lon). A source configuration may override this per server.
    #[must_use]
    pub const fn default_axis_order(self) -> AxisOrder {
        match self {
            Self::V1_0_0 => AxisOrder::LonLat,
            Self::V1_1_0 | Self::V2_0_0 => AxisOrder::LatLon,
        }
    }
}

///
/// AxisOrder
///
/// Coordinate pair ordering expected by the target server. WKT input is
/// always x/y (lon/lat); `LatLon` means every pair is swapped on the way out.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum AxisOrder {
    LatLon,
    #[default]
    LonLat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_generation_has_a_native_offset() {
        assert!(!WfsVersion::V1_0_0.native_offset());
        assert!(!WfsVersion::V1_1_0.native_offset());
        assert!(WfsVersion::V2_0_0.native_offset());
    }

    #[test]
    fn axis_order_defaults_follow_the_generation() {
        assert_eq!(WfsVersion::V1_0_0.default_axis_order(), AxisOrder::LonLat);
        assert_eq!(WfsVersion::V1_1_0.default_axis_order(), AxisOrder::LatLon);
        assert_eq!(WfsVersion::V2_0_0.default_axis_order(), AxisOrder::LatLon);
    }
}

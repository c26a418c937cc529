//! Safety-zone classification around the user's position.
//!
//! Zone computation is an external, swappable collaborator; the contract is
//! deliberately loose so an implementation may call a real places API. The
//! built-in classifier is placeholder data only.

use serde::{Deserialize, Serialize};

use super::model::GeoPoint;

/// Overlay radius used for every zone circle, in meters.
pub const ZONE_RADIUS_METERS: f64 = 500.0;

/// Safety-zone category shown around the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Green,
    Orange,
    Red,
    Police,
}

impl ZoneKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Orange => "Orange",
            Self::Red => "Red",
            Self::Police => "Police station",
        }
    }

    /// ARGB overlay color for map rendering.
    pub fn overlay_color(&self) -> u32 {
        match self {
            Self::Green => 0x5000_FF00,
            Self::Orange => 0x50FF_A500,
            Self::Red => 0x50FF_0000,
            Self::Police => 0x5000_00FF,
        }
    }
}

/// One circular zone overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCircle {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub kind: ZoneKind,
}

/// External zone-classification collaborator.
pub trait ZoneClassifier {
    fn classify(&self, around: GeoPoint) -> Vec<ZoneCircle>;
}

/// Placeholder classifier: fixed offsets around the user's position.
/// Not a geospatial algorithm; stands in until a real places backend exists.
pub struct StaticZoneClassifier;

impl ZoneClassifier for StaticZoneClassifier {
    fn classify(&self, around: GeoPoint) -> Vec<ZoneCircle> {
        let circle = |lat: f64, lon: f64, kind: ZoneKind| ZoneCircle {
            center: GeoPoint::new(lat, lon),
            radius_m: ZONE_RADIUS_METERS,
            kind,
        };

        vec![
            circle(around.lat + 0.01, around.lon, ZoneKind::Green),
            circle(around.lat - 0.01, around.lon, ZoneKind::Orange),
            circle(around.lat, around.lon + 0.01, ZoneKind::Red),
            circle(around.lat + 0.02, around.lon + 0.02, ZoneKind::Police),
        ]
    }
}

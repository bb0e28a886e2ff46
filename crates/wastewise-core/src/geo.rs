//! Great-circle distance and radius filtering for community locations.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Anything with a position on the map.
pub trait Located {
    fn coordinates(&self) -> Coordinates;
}

impl Located for crate::types::CommunityLocation {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Haversine distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// An item paired with its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithDistance<T> {
    #[serde(flatten)]
    pub item: T,
    pub distance_km: f64,
}

/// Keep items within `radius_km` of `origin`, preserving input order.
pub fn within_radius<T: Located>(
    items: impl IntoIterator<Item = T>,
    origin: Coordinates,
    radius_km: f64,
) -> Vec<WithDistance<T>> {
    items
        .into_iter()
        .filter_map(|item| {
            let distance_km = haversine_km(origin, item.coordinates());
            (distance_km <= radius_km).then_some(WithDistance { item, distance_km })
        })
        .collect()
}

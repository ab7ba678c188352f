use crate::game::economy::EconomyType;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: u32,
    pub name: String,
    pub economy: EconomyType,
    pub position: Point,
    pub orbit_radius: f64,
    /// Opaque lookup key, resolved by the localization layer.
    pub description_key: String,
}

impl Planet {
    pub fn has_shipyard(&self) -> bool {
        self.economy.has_shipyard()
    }
}

pub fn find_planet(planets: &[Planet], id: u32) -> Option<&Planet> {
    // Ids are dense, so the index is the fast path.
    planets
        .get(id as usize)
        .filter(|p| p.id == id)
        .or_else(|| planets.iter().find(|p| p.id == id))
}

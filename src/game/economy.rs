use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EconomyType {
    Mining,
    Industrial,
    Technological,
    Agricultural,
    Refinery,
}

pub const ECONOMY_TYPES: [EconomyType; 5] = [
    EconomyType::Mining,
    EconomyType::Industrial,
    EconomyType::Technological,
    EconomyType::Agricultural,
    EconomyType::Refinery,
];

impl EconomyType {
    pub fn label(self) -> &'static str {
        match self {
            EconomyType::Mining => "Mining",
            EconomyType::Industrial => "Industrial",
            EconomyType::Technological => "Technological",
            EconomyType::Agricultural => "Agricultural",
            EconomyType::Refinery => "Refinery",
        }
    }

    /// Lowercase key used to build description lookups.
    pub fn key(self) -> &'static str {
        match self {
            EconomyType::Mining => "mining",
            EconomyType::Industrial => "industrial",
            EconomyType::Technological => "technological",
            EconomyType::Agricultural => "agricultural",
            EconomyType::Refinery => "refinery",
        }
    }

    /// Goods a planet of this archetype ships out.
    pub fn produces(self) -> &'static [CargoType] {
        match self {
            EconomyType::Mining => &[CargoType::RawOres, CargoType::ExoticGases],
            EconomyType::Industrial => &[CargoType::IndustrialParts, CargoType::AdvancedPolymers],
            EconomyType::Technological => &[
                CargoType::Microchips,
                CargoType::Robotics,
                CargoType::Cybernetics,
                CargoType::LuxuryGoods,
            ],
            EconomyType::Agricultural => &[CargoType::Foodstuffs, CargoType::MedicalSupplies],
            EconomyType::Refinery => &[CargoType::RefinedFuel],
        }
    }

    /// Goods that fetch the high-demand premium when delivered here.
    pub fn demands(self) -> &'static [CargoType] {
        match self {
            EconomyType::Mining => &[
                CargoType::Foodstuffs,
                CargoType::MedicalSupplies,
                CargoType::IndustrialParts,
            ],
            EconomyType::Industrial => &[
                CargoType::RawOres,
                CargoType::RefinedFuel,
                CargoType::ExoticGases,
            ],
            EconomyType::Technological => &[
                CargoType::AdvancedPolymers,
                CargoType::IndustrialParts,
                CargoType::ExoticGases,
            ],
            EconomyType::Agricultural => &[
                CargoType::IndustrialParts,
                CargoType::LuxuryGoods,
                CargoType::Robotics,
            ],
            EconomyType::Refinery => &[CargoType::RawOres],
        }
    }

    pub fn has_shipyard(self) -> bool {
        matches!(self, EconomyType::Industrial | EconomyType::Technological)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoType {
    // Low value
    RawOres,
    Foodstuffs,
    // Mid value
    IndustrialParts,
    RefinedFuel,
    MedicalSupplies,
    // High value
    AdvancedPolymers,
    Microchips,
    Robotics,
    // Premium value
    Cybernetics,
    LuxuryGoods,
    ExoticGases,
}

impl CargoType {
    pub fn base_value(self) -> f64 {
        match self {
            CargoType::RawOres => 1.0,
            CargoType::Foodstuffs => 1.2,
            CargoType::IndustrialParts => 2.5,
            CargoType::RefinedFuel => 2.8,
            CargoType::MedicalSupplies => 3.5,
            CargoType::AdvancedPolymers => 4.5,
            CargoType::Microchips => 5.0,
            CargoType::Robotics => 6.0,
            CargoType::Cybernetics => 7.5,
            CargoType::LuxuryGoods => 8.0,
            CargoType::ExoticGases => 9.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CargoType::RawOres => "Raw Ores",
            CargoType::Foodstuffs => "Foodstuffs",
            CargoType::IndustrialParts => "Industrial Parts",
            CargoType::RefinedFuel => "Refined Fuel",
            CargoType::MedicalSupplies => "Medical Supplies",
            CargoType::AdvancedPolymers => "Adv. Polymers",
            CargoType::Microchips => "Microchips",
            CargoType::Robotics => "Robotics",
            CargoType::Cybernetics => "Cybernetics",
            CargoType::LuxuryGoods => "Luxury Goods",
            CargoType::ExoticGases => "Exotic Gases",
        }
    }
}

/// A purchasable hull. Catalog entries never change during a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipClass {
    pub id: u32,
    pub name: String,
    pub cargo_capacity: u32,
    pub fuel_capacity: f64,
    /// Fuel multiplier per unit distance; lower is better.
    pub fuel_efficiency: f64,
    pub price: i64,
}

pub fn default_ship_catalog() -> Vec<ShipClass> {
    let entry = |id, name: &str, cargo_capacity, fuel_capacity, fuel_efficiency, price| ShipClass {
        id,
        name: name.to_string(),
        cargo_capacity,
        fuel_capacity,
        fuel_efficiency,
        price,
    };
    vec![
        entry(0, "Starlight Courier", 10, 100.0, 1.0, 0),
        entry(1, "Galactic Hauler", 25, 150.0, 0.9, 5_000),
        entry(2, "Star Trader", 50, 200.0, 0.8, 25_000),
        entry(3, "Nebula Freighter", 100, 300.0, 0.7, 100_000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_archetype_produces_something() {
        for economy in ECONOMY_TYPES {
            assert!(!economy.produces().is_empty(), "{} produces nothing", economy.label());
            assert!(!economy.demands().is_empty(), "{} demands nothing", economy.label());
        }
    }

    #[test]
    fn all_eleven_cargo_types_are_produced_somewhere() {
        let produced: HashSet<CargoType> = ECONOMY_TYPES
            .iter()
            .flat_map(|e| e.produces().iter().copied())
            .collect();
        assert_eq!(produced.len(), 11);
    }

    #[test]
    fn catalog_ids_are_dense_and_starter_is_free() {
        let ships = default_ship_catalog();
        for (idx, ship) in ships.iter().enumerate() {
            assert_eq!(ship.id as usize, idx);
        }
        assert_eq!(ships[0].price, 0);
        assert!(ships.windows(2).all(|w| w[0].fuel_efficiency > w[1].fuel_efficiency));
    }

    #[test]
    fn shipyards_only_at_industrial_and_tech_worlds() {
        let yards: Vec<_> = ECONOMY_TYPES.iter().filter(|e| e.has_shipyard()).collect();
        assert_eq!(yards, vec![&EconomyType::Industrial, &EconomyType::Technological]);
    }
}

use crate::game::contracts::ContractConfig;
use crate::game::economy::{default_ship_catalog, ShipClass};
use crate::game::error::ConfigError;
use crate::game::travel::TravelConfig;
use crate::game::universe::UniverseConfig;
use serde::{Deserialize, Serialize};

/// Every tunable of a session. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub universe: UniverseConfig,
    pub travel: TravelConfig,
    pub contracts: ContractConfig,
    pub starting_credits: i64,
    pub ships: Vec<ShipClass>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            universe: UniverseConfig::default(),
            travel: TravelConfig::default(),
            contracts: ContractConfig::default(),
            starting_credits: 1_000,
            ships: default_ship_catalog(),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config; blank input yields the defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.universe.validate()?;
        self.travel.validate()?;
        self.contracts.validate()?;
        if self.starting_credits < 0 {
            return Err(ConfigError::Negative {
                field: "starting_credits",
                value: self.starting_credits as f64,
            });
        }
        if self.ships.is_empty() {
            return Err(ConfigError::EmptyShipCatalog);
        }
        for (index, ship) in self.ships.iter().enumerate() {
            if ship.id as usize != index {
                return Err(ConfigError::ShipCatalogIds { index, id: ship.id });
            }
            if !(ship.fuel_capacity > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "ships.fuel_capacity",
                    value: ship.fuel_capacity,
                });
            }
            if !(ship.fuel_efficiency >= 0.0) {
                return Err(ConfigError::Negative {
                    field: "ships.fuel_efficiency",
                    value: ship.fuel_efficiency,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn blank_and_partial_json_fill_in_defaults() {
        assert_eq!(EngineConfig::from_json("  ").ok(), Some(EngineConfig::default()));

        let cfg = EngineConfig::from_json(r#"{"starting_credits": 50, "travel": {"speed_units_per_second": 20}}"#)
            .expect("partial config parses");
        assert_eq!(cfg.starting_credits, 50);
        assert_eq!(cfg.travel.speed_units_per_second, 20.0);
        assert_eq!(cfg.travel.fuel_cost_per_unit_distance, 0.1);
        assert_eq!(cfg.universe, UniverseConfig::default());
    }

    #[test]
    fn broken_catalogs_and_ranges_are_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.ships.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyShipCatalog));

        let mut cfg = EngineConfig::default();
        cfg.ships.swap(0, 1);
        assert_eq!(cfg.validate(), Err(ConfigError::ShipCatalogIds { index: 0, id: 1 }));

        let mut cfg = EngineConfig::default();
        cfg.contracts.min_count = 9;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ContractCountRange { min: 9, max: 7 })
        );

        let mut cfg = EngineConfig::default();
        cfg.travel.speed_units_per_second = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NotPositive { .. })));
    }
}

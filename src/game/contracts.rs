use crate::game::economy::CargoType;
use crate::game::error::ConfigError;
use crate::game::planet::Planet;
use crate::geometry::distance;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: u64,
    pub origin_planet_id: u32,
    pub destination_planet_id: u32,
    pub cargo: CargoType,
    pub quantity: u32,
    pub reward: i64,
    /// Charged when the contract is cancelled.
    pub penalty: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub min_count: u32,
    pub max_count: u32,
    pub max_quantity: u32,
    /// Probability that a contract fits in the current hold.
    pub ship_sized_chance: f64,
    pub distance_factor: f64,
    pub value_factor: f64,
    pub demand_multiplier: f64,
    pub randomness_factor: f64,
    pub penalty_fraction: f64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            min_count: 3,
            max_count: 7,
            max_quantity: 120,
            ship_sized_chance: 0.7,
            distance_factor: 0.5,
            value_factor: 25.0,
            demand_multiplier: 1.6,
            randomness_factor: 0.2,
            penalty_fraction: 0.25,
        }
    }
}

impl ContractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_count > self.max_count {
            return Err(ConfigError::ContractCountRange {
                min: self.min_count,
                max: self.max_count,
            });
        }
        if self.max_quantity == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_quantity",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("ship_sized_chance", self.ship_sized_chance),
            ("penalty_fraction", self.penalty_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        for (field, value) in [
            ("distance_factor", self.distance_factor),
            ("value_factor", self.value_factor),
            ("demand_multiplier", self.demand_multiplier),
            ("randomness_factor", self.randomness_factor),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn penalty_for(&self, reward: i64) -> i64 {
        (reward as f64 * self.penalty_fraction).round() as i64
    }
}

/// Issues contracts for one planet and hands out ids that never repeat
/// within a session.
pub struct ContractBoard<'a> {
    config: &'a ContractConfig,
    next_id: &'a mut u64,
}

impl<'a> ContractBoard<'a> {
    pub fn new(config: &'a ContractConfig, next_id: &'a mut u64) -> Self {
        Self { config, next_id }
    }

    /// Synthesizes a fresh batch of contracts originating at `origin`.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: &Planet,
        all_planets: &[Planet],
        ship_cargo_capacity: u32,
    ) -> Vec<Contract> {
        let destinations: Vec<&Planet> = all_planets.iter().filter(|p| p.id != origin.id).collect();
        let produced = origin.economy.produces();
        if destinations.is_empty() || produced.is_empty() {
            return Vec::new();
        }

        let count = rng.gen_range(self.config.min_count..=self.config.max_count);
        let mut contracts = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (Some(destination), Some(&cargo)) =
                (destinations.choose(rng), produced.choose(rng))
            else {
                break;
            };
            let quantity = self.roll_quantity(rng, ship_cargo_capacity);
            let reward = self.price(rng, origin, destination, cargo, quantity);

            contracts.push(Contract {
                id: self.allocate_id(),
                origin_planet_id: origin.id,
                destination_planet_id: destination.id,
                cargo,
                quantity,
                reward,
                penalty: self.config.penalty_for(reward),
            });
        }
        contracts
    }

    fn allocate_id(&mut self) -> u64 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    fn roll_quantity<R: Rng + ?Sized>(&self, rng: &mut R, ship_cargo_capacity: u32) -> u32 {
        let max = self.config.max_quantity;
        if rng.gen::<f64>() < self.config.ship_sized_chance {
            let upper = ship_cargo_capacity.clamp(1, max);
            rng.gen_range(1..=upper)
        } else {
            // Oversized work that only a bigger hull can take.
            let lower = ship_cargo_capacity.saturating_add(1).min(max);
            rng.gen_range(lower..=max)
        }
    }

    fn price<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        origin: &Planet,
        destination: &Planet,
        cargo: CargoType,
        quantity: u32,
    ) -> i64 {
        let cfg = self.config;
        let haul = distance(origin.position, destination.position) * cfg.distance_factor;
        let goods = quantity as f64 * cargo.base_value() * cfg.value_factor;
        let demand = if destination.economy.demands().contains(&cargo) {
            cfg.demand_multiplier
        } else {
            1.0
        };
        let variance = 1.0 + rng.gen::<f64>() * cfg.randomness_factor;
        ((haul + goods) * demand * variance).round().max(0.0) as i64
    }
}

pub fn cargo_used(manifest: &[Contract]) -> u32 {
    manifest.iter().map(|c| c.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::economy::EconomyType;
    use crate::geometry::Point;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn planet(id: u32, economy: EconomyType, x: f64, y: f64) -> Planet {
        Planet {
            id,
            name: format!("P{id}"),
            economy,
            position: Point::new(x, y),
            orbit_radius: x.hypot(y),
            description_key: format!("{}_desc_1", economy.key()),
        }
    }

    fn planets() -> Vec<Planet> {
        vec![
            planet(0, EconomyType::Mining, 150.0, 0.0),
            planet(1, EconomyType::Industrial, 0.0, 250.0),
            planet(2, EconomyType::Agricultural, -350.0, 0.0),
            planet(3, EconomyType::Refinery, 0.0, -450.0),
        ]
    }

    #[test]
    fn batches_respect_count_cargo_and_destination_rules() {
        let config = ContractConfig::default();
        let all = planets();
        let mut next_id = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let batch = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[0], &all, 10);
            assert!((3..=7).contains(&batch.len()));
            for c in &batch {
                assert_eq!(c.origin_planet_id, 0);
                assert_ne!(c.destination_planet_id, 0);
                assert!(EconomyType::Mining.produces().contains(&c.cargo));
                assert!((1..=120).contains(&c.quantity));
                assert!(c.reward >= 0);
                assert_eq!(c.penalty, (c.reward as f64 * 0.25).round() as i64);
            }
        }
    }

    #[test]
    fn ids_never_repeat_across_batches() {
        let config = ContractConfig::default();
        let all = planets();
        let mut next_id = 40;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let first = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[1], &all, 25);
        let second = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[2], &all, 25);
        let mut ids: Vec<u64> = first.iter().chain(&second).map(|c| c.id).collect();
        assert_eq!(ids[0], 40);
        let total = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(next_id, 40 + total as u64);
    }

    #[test]
    fn oversized_contracts_exceed_the_hold() {
        let config = ContractConfig {
            ship_sized_chance: 0.0,
            ..ContractConfig::default()
        };
        let all = planets();
        let mut next_id = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let batch = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[0], &all, 10);
        assert!(batch.iter().all(|c| (11..=120).contains(&c.quantity)));

        // A hold at or above the cap clamps the draw to the cap.
        let batch = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[0], &all, 500);
        assert!(batch.iter().all(|c| c.quantity == 120));
    }

    #[test]
    fn reward_follows_pricing_formula_without_variance() {
        let config = ContractConfig {
            min_count: 1,
            max_count: 1,
            ship_sized_chance: 1.0,
            randomness_factor: 0.0,
            ..ContractConfig::default()
        };
        // Refinery produces only Refined Fuel; Industrial demands it.
        let origin = planet(0, EconomyType::Refinery, 300.0, 0.0);
        let dest = planet(1, EconomyType::Industrial, 0.0, 400.0);
        let all = vec![origin.clone(), dest];
        let mut next_id = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let batch = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &origin, &all, 1);
        let c = &batch[0];
        assert_eq!(c.cargo, CargoType::RefinedFuel);
        assert_eq!(c.quantity, 1);
        // (500 * 0.5 + 1 * 2.8 * 25) * 1.6 = 512
        assert_eq!(c.reward, 512);
        assert_eq!(c.penalty, 128);
    }

    #[test]
    fn lone_planet_gets_no_contracts() {
        let config = ContractConfig::default();
        let all = vec![planet(0, EconomyType::Mining, 150.0, 0.0)];
        let mut next_id = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let batch = ContractBoard::new(&config, &mut next_id).generate(&mut rng, &all[0], &all, 10);
        assert!(batch.is_empty());
        assert_eq!(next_id, 0);
    }
}

use crate::game::economy::{EconomyType, ECONOMY_TYPES};
use crate::game::error::ConfigError;
use crate::game::naming::{generate_planet_name, name_pool_size};
use crate::game::planet::Planet;
use crate::geometry::{distance, Point};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::TAU;

const DESCRIPTION_VARIANTS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub planet_count: usize,
    pub orbit_radii: Vec<f64>,
    pub min_separation: f64,
    pub placement_attempts: usize,
    /// Radius of the exclusion zone around the central star.
    pub gravity_well_radius: f64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            planet_count: 12,
            orbit_radii: vec![150.0, 250.0, 350.0, 450.0],
            min_separation: 60.0,
            placement_attempts: 50,
            gravity_well_radius: 80.0,
        }
    }
}

impl UniverseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orbit_radii.is_empty() {
            return Err(ConfigError::NoOrbits);
        }
        // A contract needs a destination other than its origin.
        if self.planet_count < 2 {
            return Err(ConfigError::TooFewPlanets {
                min: 2,
                value: self.planet_count,
            });
        }
        if self.planet_count > name_pool_size() {
            return Err(ConfigError::NamePoolExhausted {
                value: self.planet_count,
                pool: name_pool_size(),
            });
        }
        for &radius in &self.orbit_radii {
            if !(radius > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "orbit_radii",
                    value: radius,
                });
            }
        }
        if self.min_separation < 0.0 {
            return Err(ConfigError::Negative {
                field: "min_separation",
                value: self.min_separation,
            });
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "placement_attempts",
                value: 0.0,
            });
        }
        if self.gravity_well_radius < 0.0 {
            return Err(ConfigError::Negative {
                field: "gravity_well_radius",
                value: self.gravity_well_radius,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    pub planets: Vec<Planet>,
    /// Planets that were placed closer than the minimum separation because
    /// every placement attempt collided.
    pub crowded: Vec<u32>,
}

pub struct UniverseGenerator<R = ChaCha8Rng> {
    rng: R,
    used_names: HashSet<String>,
    config: UniverseConfig,
}

impl UniverseGenerator<ChaCha8Rng> {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, UniverseConfig::default())
    }

    pub fn with_config(seed: u64, config: UniverseConfig) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> UniverseGenerator<R> {
    pub fn from_rng(rng: R, config: UniverseConfig) -> Self {
        Self {
            rng,
            used_names: HashSet::new(),
            config,
        }
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    pub fn generate(&mut self) -> Result<Universe, ConfigError> {
        self.config.validate()?;

        let count = self.config.planet_count;
        let mut planets: Vec<Planet> = Vec::with_capacity(count);
        let mut crowded = Vec::new();

        for index in 0..count {
            let id = index as u32;
            let name = generate_planet_name(&mut self.rng, &mut self.used_names).ok_or(
                ConfigError::NamePoolExhausted {
                    value: count,
                    pool: name_pool_size(),
                },
            )?;
            // Round-robin keeps the rings evenly populated.
            let orbit_radius = self.config.orbit_radii[index % self.config.orbit_radii.len()];
            let (position, clear) = self.place_on_orbit(orbit_radius, &planets);
            if !clear {
                log::warn!(
                    "no clear position for planet {} after {} attempts",
                    name,
                    self.config.placement_attempts
                );
                crowded.push(id);
            }

            let economy = self.pick_economy();
            let variant = self.rng.gen_range(1..=DESCRIPTION_VARIANTS);
            planets.push(Planet {
                id,
                name,
                economy,
                position,
                orbit_radius,
                description_key: format!("{}_desc_{}", economy.key(), variant),
            });
        }

        Ok(Universe { planets, crowded })
    }

    /// Returns the chosen position and whether it respects the separation.
    /// After the attempt budget runs out the last candidate is kept anyway.
    fn place_on_orbit(&mut self, radius: f64, placed: &[Planet]) -> (Point, bool) {
        let mut candidate = Point::ORIGIN;
        for _ in 0..self.config.placement_attempts {
            let angle = self.rng.gen_range(0.0..TAU);
            candidate = Point::on_orbit(radius, angle);
            let clear = placed
                .iter()
                .all(|p| distance(candidate, p.position) >= self.config.min_separation);
            if clear {
                return (candidate, true);
            }
        }
        (candidate, false)
    }

    fn pick_economy(&mut self) -> EconomyType {
        ECONOMY_TYPES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(EconomyType::Mining)
    }
}

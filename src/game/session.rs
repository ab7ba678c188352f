use crate::game::config::EngineConfig;
use crate::game::contracts::{cargo_used, Contract, ContractBoard};
use crate::game::economy::ShipClass;
use crate::game::error::{ConfigError, SessionError};
use crate::game::events::SessionEvent;
use crate::game::planet::{find_planet, Planet};
use crate::game::travel::{plan, GravityWell, TravelPath};
use crate::game::universe::UniverseGenerator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Top-ups smaller than this are not sold.
const MIN_FUEL_PURCHASE: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnedShip {
    pub ship_id: u32,
    pub fuel: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub credits: i64,
    pub current_ship_id: u32,
    pub owned_ships: Vec<OwnedShip>,
    pub current_planet_id: u32,
    /// Accepted contracts not yet delivered.
    pub cargo: Vec<Contract>,
}

/// The persisted aggregate: everything needed to resume a docked game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub player: PlayerState,
    pub planets: Vec<Planet>,
    /// Available contracts per planet id.
    pub contracts: BTreeMap<u32, Vec<Contract>>,
    pub ships: Vec<ShipClass>,
    #[serde(default)]
    pub next_contract_id: u64,
}

impl GameSession {
    pub fn planet(&self, id: u32) -> Option<&Planet> {
        find_planet(&self.planets, id)
    }

    pub fn ship_class(&self, id: u32) -> Option<&ShipClass> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn owned_ship(&self, id: u32) -> Option<&OwnedShip> {
        self.player.owned_ships.iter().find(|s| s.ship_id == id)
    }

    pub fn cargo_used(&self) -> u32 {
        cargo_used(&self.player.cargo)
    }

    pub fn available_contracts(&self, planet: u32) -> &[Contract] {
        self.contracts.get(&planet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves the active hull and its fuel state.
    fn active(&self) -> Result<(&ShipClass, &OwnedShip), SessionError> {
        let id = self.player.current_ship_id;
        let class = self.ship_class(id).ok_or(SessionError::UnknownShip { id })?;
        let owned = self.owned_ship(id).ok_or(SessionError::ShipNotOwned { id })?;
        Ok((class, owned))
    }

    fn active_fuel_mut(&mut self) -> Option<&mut f64> {
        let id = self.player.current_ship_id;
        self.player
            .owned_ships
            .iter_mut()
            .find(|s| s.ship_id == id)
            .map(|s| &mut s.fuel)
    }

    /// Checks the cross references a loaded snapshot must satisfy.
    pub fn check_integrity(&self) -> Result<(), SessionError> {
        self.active()?;
        let here = self.player.current_planet_id;
        self.planet(here)
            .ok_or(SessionError::UnknownPlanet { id: here })?;
        for owned in &self.player.owned_ships {
            self.ship_class(owned.ship_id)
                .ok_or(SessionError::UnknownShip { id: owned.ship_id })?;
        }
        let pooled = self.contracts.values().flatten();
        for contract in self.player.cargo.iter().chain(pooled) {
            for id in [contract.origin_planet_id, contract.destination_planet_id] {
                self.planet(id).ok_or(SessionError::UnknownPlanet { id })?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transit {
    pub from: u32,
    pub to: u32,
    pub path: TravelPath,
    pub fuel_used: f64,
    pub started_at_ms: u64,
    pub duration_secs: f64,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    InTransit(Transit),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "docked",
            Phase::InTransit(_) => "in transit",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TravelPreview {
    pub to: u32,
    pub path: TravelPath,
    pub fuel_required: f64,
    pub fuel_available: f64,
    pub duration_secs: f64,
}

impl TravelPreview {
    pub fn affordable(&self) -> bool {
        self.fuel_available >= self.fuel_required
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FuelQuote {
    pub amount: f64,
    pub cost: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arrival {
    pub planet: u32,
    pub completed: Vec<Contract>,
    pub reward: i64,
    pub restocked: bool,
    /// Next route stop to launch towards, if this leg was part of a route.
    pub next_stop: Option<u32>,
    pub events: Vec<SessionEvent>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    Docked,
    Underway { progress: f64 },
    Arrived(Arrival),
}

pub type Outcome = Result<Vec<SessionEvent>, SessionError>;

/// Owns one game and is the only place its state changes.
pub struct Session<R = ChaCha8Rng> {
    state: GameSession,
    phase: Phase,
    route: VecDeque<u32>,
    config: EngineConfig,
    rng: R,
}

impl Session<ChaCha8Rng> {
    pub fn new_game(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new_game_with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn resume(
        state: GameSession,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::resume_with_rng(state, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn new_game_with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut generator = UniverseGenerator::from_rng(rng, config.universe.clone());
        let universe = generator.generate()?;
        let mut rng = generator.into_rng();
        if !universe.crowded.is_empty() {
            log::warn!(
                "{} planets placed inside the minimum separation",
                universe.crowded.len()
            );
        }

        // Validation guarantees a non-empty catalog and universe.
        let starter = config.ships[0].clone();
        let home = universe.planets[0].clone();
        let mut next_contract_id = 0;
        let opening = ContractBoard::new(&config.contracts, &mut next_contract_id).generate(
            &mut rng,
            &home,
            &universe.planets,
            starter.cargo_capacity,
        );

        let state = GameSession {
            player: PlayerState {
                credits: config.starting_credits,
                current_ship_id: starter.id,
                owned_ships: vec![OwnedShip {
                    ship_id: starter.id,
                    fuel: starter.fuel_capacity,
                }],
                current_planet_id: home.id,
                cargo: Vec::new(),
            },
            planets: universe.planets,
            contracts: BTreeMap::from([(home.id, opening)]),
            ships: config.ships.clone(),
            next_contract_id,
        };
        log::info!("new game starting at {} in the {}", home.name, starter.name);

        Ok(Self::assemble(state, config, rng))
    }

    /// Continues a saved snapshot. The config is checked again because it
    /// comes from the host and may differ from the one the save started with.
    pub fn resume_with_rng(
        state: GameSession,
        config: EngineConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(state, config, rng))
    }

    fn assemble(state: GameSession, config: EngineConfig, rng: R) -> Self {
        Self {
            state,
            phase: Phase::Idle,
            route: VecDeque::new(),
            config,
            rng,
        }
    }

    pub fn state(&self) -> &GameSession {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn route(&self) -> &VecDeque<u32> {
        &self.route
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_docked(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    fn require_docked(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.is_docked() {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                operation,
                phase: self.phase.label(),
            })
        }
    }

    fn well(&self) -> GravityWell {
        GravityWell::at_origin(self.config.universe.gravity_well_radius)
    }

    /// Plans the leg from the current planet without changing anything.
    pub fn preview_travel(&self, to: u32) -> Result<TravelPreview, SessionError> {
        let here = self.state.player.current_planet_id;
        let origin = self
            .state
            .planet(here)
            .ok_or(SessionError::UnknownPlanet { id: here })?;
        let target = self
            .state
            .planet(to)
            .ok_or(SessionError::UnknownPlanet { id: to })?;
        let (class, owned) = self.state.active()?;

        let travel = &self.config.travel;
        let path = plan(
            origin.position,
            target.position,
            self.well(),
            travel.deflection_factor,
        );
        Ok(TravelPreview {
            to,
            fuel_required: travel.fuel_required(path.distance, class.fuel_efficiency),
            fuel_available: owned.fuel,
            duration_secs: travel.duration_secs(path.distance),
            path,
        })
    }

    pub fn start_travel(&mut self, to: u32, now_ms: u64) -> Outcome {
        self.require_docked("start_travel")?;
        let from = self.state.player.current_planet_id;
        if to == from {
            return Err(SessionError::AlreadyDocked { planet: to });
        }
        let preview = self.preview_travel(to)?;
        if !preview.affordable() {
            return Err(SessionError::InsufficientFuel {
                required: preview.fuel_required,
                available: preview.fuel_available,
            });
        }

        // Fuel is spent up front, not during the flight.
        if let Some(fuel) = self.state.active_fuel_mut() {
            *fuel = (*fuel - preview.fuel_required).max(0.0);
        }
        let event = SessionEvent::TravelStarted {
            from,
            to,
            fuel_used: preview.fuel_required,
            duration_secs: preview.duration_secs,
            curved: preview.path.curved,
        };
        self.phase = Phase::InTransit(Transit {
            from,
            to,
            path: preview.path,
            fuel_used: preview.fuel_required,
            started_at_ms: now_ms,
            duration_secs: preview.duration_secs,
            progress: 0.0,
        });
        Ok(vec![event])
    }

    /// Advances an active leg; a no-op while docked.
    pub fn tick(&mut self, now_ms: u64) -> Tick {
        let Phase::InTransit(transit) = &mut self.phase else {
            return Tick::Docked;
        };

        transit.progress = if transit.duration_secs > 0.0 {
            let elapsed = now_ms.saturating_sub(transit.started_at_ms) as f64 / 1000.0;
            (elapsed / transit.duration_secs * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };
        if transit.progress < 100.0 {
            return Tick::Underway {
                progress: transit.progress,
            };
        }

        let destination = transit.to;
        Tick::Arrived(self.arrive(destination))
    }

    /// Moves the leg's start forward so a pause does not count as flight time.
    pub fn shift_clock(&mut self, paused_ms: u64) {
        if let Phase::InTransit(transit) = &mut self.phase {
            transit.started_at_ms = transit.started_at_ms.saturating_add(paused_ms);
        }
    }

    fn arrive(&mut self, planet: u32) -> Arrival {
        self.phase = Phase::Idle;
        self.state.player.current_planet_id = planet;
        let mut events = vec![SessionEvent::Arrived { planet }];

        let (completed, remaining): (Vec<Contract>, Vec<Contract>) = self
            .state
            .player
            .cargo
            .drain(..)
            .partition(|c| c.destination_planet_id == planet);
        self.state.player.cargo = remaining;
        let reward: i64 = completed.iter().map(|c| c.reward).sum();
        if !completed.is_empty() {
            self.state.player.credits += reward;
            events.push(SessionEvent::ContractsCompleted {
                contracts: completed.iter().map(|c| c.id).collect(),
                reward,
            });
        }

        let restocked = self.restock(planet);
        if restocked {
            events.push(SessionEvent::ContractsPosted {
                planet,
                count: self.state.available_contracts(planet).len(),
            });
        }

        let mut next_stop = None;
        if self.route.front() == Some(&planet) {
            self.route.pop_front();
            next_stop = self.route.front().copied();
            events.push(SessionEvent::RouteAdvanced { next: next_stop });
        }

        log::info!(
            "arrived at planet {planet}: {} contracts delivered for {reward}",
            completed.len()
        );
        Arrival {
            planet,
            completed,
            reward,
            restocked,
            next_stop,
            events,
        }
    }

    /// Refills a planet's board only when nothing is left on it.
    fn restock(&mut self, planet: u32) -> bool {
        if !self.state.available_contracts(planet).is_empty() {
            return false;
        }
        let Some(origin) = self.state.planet(planet).cloned() else {
            return false;
        };
        let capacity = self
            .state
            .active()
            .map(|(class, _)| class.cargo_capacity)
            .unwrap_or(1);
        let batch = ContractBoard::new(&self.config.contracts, &mut self.state.next_contract_id)
            .generate(&mut self.rng, &origin, &self.state.planets, capacity);
        log::debug!("posted {} contracts at {}", batch.len(), origin.name);
        self.state.contracts.insert(planet, batch);
        true
    }

    pub fn buy_fuel(&mut self, amount: f64, cost: i64) -> Outcome {
        self.require_docked("buy_fuel")?;
        let cost = cost.max(0);
        let (class, owned) = self.state.active()?;
        let capacity = class.fuel_capacity;
        let amount = amount.max(0.0).min(capacity - owned.fuel);
        if amount < MIN_FUEL_PURCHASE {
            return Ok(Vec::new());
        }
        let credits = self.state.player.credits;
        if credits < cost {
            return Err(SessionError::InsufficientCredits {
                required: cost,
                available: credits,
            });
        }

        self.state.player.credits -= cost;
        if let Some(fuel) = self.state.active_fuel_mut() {
            *fuel = (*fuel + amount).min(capacity);
        }
        Ok(vec![SessionEvent::Refueled { amount, cost }])
    }

    /// Fuel needed to fill the active tank and what it costs here. Less than
    /// one missing unit is quoted as nothing to buy.
    pub fn refuel_quote(&self) -> Result<FuelQuote, SessionError> {
        let (class, owned) = self.state.active()?;
        let missing = class.fuel_capacity - owned.fuel;
        let amount = if missing < MIN_FUEL_PURCHASE { 0.0 } else { missing };
        Ok(FuelQuote {
            amount,
            cost: (amount * self.config.travel.fuel_price_per_unit).round() as i64,
        })
    }

    pub fn refuel_full(&mut self) -> Outcome {
        let quote = self.refuel_quote()?;
        self.buy_fuel(quote.amount, quote.cost)
    }

    pub fn accept_contract(&mut self, contract_id: u64) -> Outcome {
        self.require_docked("accept_contract")?;
        let here = self.state.player.current_planet_id;
        let index = self
            .state
            .available_contracts(here)
            .iter()
            .position(|c| c.id == contract_id)
            .ok_or(SessionError::UnknownContract { id: contract_id })?;
        let requested = self.state.available_contracts(here)[index].quantity;
        let (class, _) = self.state.active()?;
        let used = self.state.cargo_used();
        if used + requested > class.cargo_capacity {
            return Err(SessionError::CargoOverflow {
                used,
                requested,
                capacity: class.cargo_capacity,
            });
        }

        let Some(pool) = self.state.contracts.get_mut(&here) else {
            return Err(SessionError::UnknownContract { id: contract_id });
        };
        let contract = pool.remove(index);
        self.state.player.cargo.push(contract);
        Ok(vec![SessionEvent::ContractAccepted {
            contract: contract_id,
        }])
    }

    /// Drops an accepted contract and charges its penalty. Credits may go
    /// negative here.
    pub fn cancel_contract(&mut self, contract_id: u64) -> Outcome {
        let index = self
            .state
            .player
            .cargo
            .iter()
            .position(|c| c.id == contract_id)
            .ok_or(SessionError::UnknownContract { id: contract_id })?;
        let contract = self.state.player.cargo.remove(index);
        self.state.player.credits -= contract.penalty;
        Ok(vec![SessionEvent::ContractCancelled {
            contract: contract.id,
            penalty: contract.penalty,
        }])
    }

    pub fn buy_ship(&mut self, ship_id: u32) -> Outcome {
        self.require_docked("buy_ship")?;
        let class = self
            .state
            .ship_class(ship_id)
            .ok_or(SessionError::UnknownShip { id: ship_id })?;
        let here = self.state.player.current_planet_id;
        let has_yard = self.state.planet(here).is_some_and(Planet::has_shipyard);
        if !has_yard {
            return Err(SessionError::NoShipyard { planet: here });
        }
        if self.state.owned_ship(ship_id).is_some() {
            return Err(SessionError::ShipAlreadyOwned { id: ship_id });
        }
        let credits = self.state.player.credits;
        if credits < class.price {
            return Err(SessionError::InsufficientCredits {
                required: class.price,
                available: credits,
            });
        }
        if !self.state.player.cargo.is_empty() {
            return Err(SessionError::CargoNotEmpty {
                contracts: self.state.player.cargo.len(),
            });
        }

        let (price, fuel) = (class.price, class.fuel_capacity);
        let player = &mut self.state.player;
        player.credits -= price;
        player.owned_ships.push(OwnedShip { ship_id, fuel });
        player.current_ship_id = ship_id;
        Ok(vec![
            SessionEvent::ShipPurchased { ship: ship_id },
            SessionEvent::ShipActivated { ship: ship_id },
        ])
    }

    pub fn switch_ship(&mut self, ship_id: u32) -> Outcome {
        self.require_docked("switch_ship")?;
        if !self.state.player.cargo.is_empty() {
            return Err(SessionError::CargoNotEmpty {
                contracts: self.state.player.cargo.len(),
            });
        }
        if self.state.owned_ship(ship_id).is_none() {
            return Err(SessionError::ShipNotOwned { id: ship_id });
        }
        if self.state.player.current_ship_id == ship_id {
            return Ok(Vec::new());
        }
        self.state.player.current_ship_id = ship_id;
        Ok(vec![SessionEvent::ShipActivated { ship: ship_id }])
    }

    pub fn add_route_stop(&mut self, planet: u32) -> Outcome {
        self.state
            .planet(planet)
            .ok_or(SessionError::UnknownPlanet { id: planet })?;
        if self.route.contains(&planet) {
            return Err(SessionError::RouteStopDuplicate { id: planet });
        }
        self.route.push_back(planet);
        Ok(vec![SessionEvent::RouteStopAdded { planet }])
    }

    pub fn remove_route_stop(&mut self, planet: u32) -> Outcome {
        let before = self.route.len();
        self.route.retain(|&stop| stop != planet);
        if self.route.len() == before {
            return Ok(Vec::new());
        }
        Ok(vec![SessionEvent::RouteStopRemoved { planet }])
    }

    pub fn clear_route(&mut self) -> Outcome {
        if self.route.is_empty() {
            return Ok(Vec::new());
        }
        self.route.clear();
        Ok(vec![SessionEvent::RouteCleared])
    }

    /// Starts the leg towards the head of the route. Leading stops at the
    /// current planet are already satisfied and get dropped first.
    pub fn launch_route(&mut self, now_ms: u64) -> Outcome {
        self.require_docked("launch_route")?;
        let here = self.state.player.current_planet_id;
        let skip = self.route.iter().take_while(|&&stop| stop == here).count();
        let Some(&next) = self.route.get(skip) else {
            return Err(SessionError::InvalidTransition {
                operation: "launch_route",
                phase: "route is empty",
            });
        };
        let mut events = self.start_travel(next, now_ms)?;
        if skip > 0 {
            self.route.drain(..skip);
            events.insert(0, SessionEvent::RouteAdvanced { next: Some(next) });
        }
        Ok(events)
    }
}

use serde::Serialize;
use thiserror::Error;

/// Rejections raised by session operations. A failing operation never
/// mutates the session.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionError {
    #[error("not enough fuel: need {required:.2}, have {available:.2}")]
    InsufficientFuel { required: f64, available: f64 },
    #[error("not enough credits: need {required}, have {available}")]
    InsufficientCredits { required: i64, available: i64 },
    #[error("cargo hold overflow: {used} used + {requested} requested > {capacity}")]
    CargoOverflow {
        used: u32,
        requested: u32,
        capacity: u32,
    },
    #[error("cargo hold must be empty ({contracts} contracts aboard)")]
    CargoNotEmpty { contracts: usize },
    #[error("{operation} is not allowed while {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: &'static str,
    },
    #[error("already docked at planet {planet}")]
    AlreadyDocked { planet: u32 },
    #[error("no shipyard at planet {planet}")]
    NoShipyard { planet: u32 },
    #[error("unknown planet {id}")]
    UnknownPlanet { id: u32 },
    #[error("unknown contract {id}")]
    UnknownContract { id: u64 },
    #[error("unknown ship class {id}")]
    UnknownShip { id: u32 },
    #[error("ship class {id} is already owned")]
    ShipAlreadyOwned { id: u32 },
    #[error("ship class {id} is not owned")]
    ShipNotOwned { id: u32 },
    #[error("planet {id} is already on the route")]
    RouteStopDuplicate { id: u32 },
}

/// Errors raised when engine configuration invariants are violated.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("at least one orbit radius is required")]
    NoOrbits,
    #[error("at least {min} planets are required (got {value})")]
    TooFewPlanets { min: usize, value: usize },
    #[error("{value} planets exceed the {pool} unique names available")]
    NamePoolExhausted { value: usize, pool: usize },
    #[error("{field} must be positive (got {value:.2})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("contract count window invalid (min {min} > max {max})")]
    ContractCountRange { min: u32, max: u32 },
    #[error("ship catalog is empty")]
    EmptyShipCatalog,
    #[error("ship catalog ids must be dense from 0 (entry {index} has id {id})")]
    ShipCatalogIds { index: usize, id: u32 },
}

use crate::game::error::SessionError;
use serde::Serialize;

/// Structured notifications for the presentation and localization layers.
/// They carry ids and amounts, never display text.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    TravelStarted {
        from: u32,
        to: u32,
        fuel_used: f64,
        duration_secs: f64,
        curved: bool,
    },
    Arrived {
        planet: u32,
    },
    ContractsCompleted {
        contracts: Vec<u64>,
        reward: i64,
    },
    ContractsPosted {
        planet: u32,
        count: usize,
    },
    ContractAccepted {
        contract: u64,
    },
    ContractCancelled {
        contract: u64,
        penalty: i64,
    },
    Refueled {
        amount: f64,
        cost: i64,
    },
    ShipPurchased {
        ship: u32,
    },
    ShipActivated {
        ship: u32,
    },
    RouteStopAdded {
        planet: u32,
    },
    RouteStopRemoved {
        planet: u32,
    },
    RouteCleared,
    RouteAdvanced {
        next: Option<u32>,
    },
    RouteHalted {
        planet: u32,
        reason: SessionError,
    },
}

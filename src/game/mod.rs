pub mod config;
pub mod contracts;
pub mod economy;
pub mod error;
pub mod events;
pub mod naming;
pub mod planet;
pub mod session;
pub mod travel;
pub mod universe;

use crate::save::{load_session, save_session, SaveError, SaveSlot};
use config::EngineConfig;
use error::{ConfigError, SessionError};
use events::SessionEvent;
use serde::Serialize;
use session::{FuelQuote, GameSession, Outcome, Phase, Session, Tick};

/// Host-side wrapper around a [`Session`]: owns the save slot, the pause
/// clock and route chaining. Every successful intent is autosaved.
pub struct Game<S: SaveSlot> {
    session: Session,
    slot: S,
    paused_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Leg progress in percent; `None` when docked.
    pub progress: Option<f64>,
    pub events: Vec<SessionEvent>,
}

#[derive(Serialize)]
pub struct TransitView {
    pub from: u32,
    pub to: u32,
    pub progress: f64,
    pub duration_secs: f64,
    pub distance: f64,
    pub curved: bool,
    pub path: String,
}

/// Everything the presentation layer draws in one frame.
#[derive(Serialize)]
pub struct GameView<'a> {
    pub state: &'a GameSession,
    pub phase: &'static str,
    pub transit: Option<TransitView>,
    pub route: Vec<u32>,
    pub paused: bool,
    pub cargo_used: u32,
    pub refuel: Option<FuelQuote>,
}

impl<S: SaveSlot> Game<S> {
    pub fn new(config: EngineConfig, seed: u64, slot: S) -> Result<Self, ConfigError> {
        let session = Session::new_game(config, seed)?;
        let mut game = Self {
            session,
            slot,
            paused_at: None,
        };
        game.autosave();
        Ok(game)
    }

    /// Continues from the slot. `Ok(None)` means there is nothing usable in
    /// it; a bad config is reported whether or not a save exists.
    pub fn resume(
        config: EngineConfig,
        seed: u64,
        mut slot: S,
    ) -> Result<Option<Self>, ConfigError> {
        config.validate()?;
        let Some(state) = load_session(&mut slot) else {
            return Ok(None);
        };
        Ok(Some(Self {
            session: Session::resume(state, config, seed)?,
            slot,
            paused_at: None,
        }))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now_ms);
        }
    }

    /// Ends a pause; the paused span is not counted as flight time.
    pub fn unpause(&mut self, now_ms: u64) {
        if let Some(since) = self.paused_at.take() {
            self.session.shift_clock(now_ms.saturating_sub(since));
        }
    }

    pub fn save(&mut self) -> Result<(), SaveError> {
        save_session(&mut self.slot, self.session.state())
    }

    fn autosave(&mut self) {
        if let Err(err) = self.save() {
            log::warn!("autosave failed: {err}");
        }
    }

    /// Runs one player intent. Input is ignored while paused.
    pub fn apply(
        &mut self,
        operation: &'static str,
        intent: impl FnOnce(&mut Session) -> Outcome,
    ) -> Outcome {
        if self.is_paused() {
            return Err(SessionError::InvalidTransition {
                operation,
                phase: "paused",
            });
        }
        let events = intent(&mut self.session)?;
        self.autosave();
        Ok(events)
    }

    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        if self.is_paused() {
            return TickReport {
                progress: self.progress(),
                events: Vec::new(),
            };
        }

        let arrival = match self.session.tick(now_ms) {
            Tick::Docked => {
                return TickReport {
                    progress: None,
                    events: Vec::new(),
                }
            }
            Tick::Underway { progress } => {
                return TickReport {
                    progress: Some(progress),
                    events: Vec::new(),
                }
            }
            Tick::Arrived(arrival) => arrival,
        };

        let mut events = arrival.events;
        if let Some(next) = arrival.next_stop {
            match self.session.start_travel(next, now_ms) {
                Ok(more) => events.extend(more),
                Err(reason) => {
                    log::warn!("route halted before planet {next}: {reason}");
                    events.push(SessionEvent::RouteHalted {
                        planet: next,
                        reason,
                    });
                }
            }
        }
        self.autosave();
        TickReport {
            progress: self.progress(),
            events,
        }
    }

    fn progress(&self) -> Option<f64> {
        match self.session.phase() {
            Phase::Idle => None,
            Phase::InTransit(transit) => Some(transit.progress),
        }
    }

    pub fn view(&self) -> GameView<'_> {
        let transit = match self.session.phase() {
            Phase::Idle => None,
            Phase::InTransit(t) => Some(TransitView {
                from: t.from,
                to: t.to,
                progress: t.progress,
                duration_secs: t.duration_secs,
                distance: t.path.distance,
                curved: t.path.curved,
                path: t.path.svg(),
            }),
        };
        let state = self.session.state();
        GameView {
            state,
            phase: self.session.phase().label(),
            transit,
            route: self.session.route().iter().copied().collect(),
            paused: self.is_paused(),
            cargo_used: state.cargo_used(),
            refuel: self.session.refuel_quote().ok(),
        }
    }
}

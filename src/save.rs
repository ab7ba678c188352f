use crate::game::session::GameSession;
use thiserror::Error;

/// The single well-known slot every save lands in.
pub const SAVE_KEY: &str = "orbital-hauler.save";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not encode save: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Write(String),
}

/// One persistent string slot owned by the host.
pub trait SaveSlot {
    fn read(&self) -> Option<String>;
    fn write(&mut self, data: &str) -> Result<(), SaveError>;
    fn clear(&mut self);
}

#[derive(Debug, Default, Clone)]
pub struct MemorySlot {
    data: Option<String>,
}

impl MemorySlot {
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

impl SaveSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.data.clone()
    }

    fn write(&mut self, data: &str) -> Result<(), SaveError> {
        self.data = Some(data.to_string());
        Ok(())
    }

    fn clear(&mut self) {
        self.data = None;
    }
}

/// `localStorage` under [`SAVE_KEY`].
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSlot;

#[cfg(target_arch = "wasm32")]
impl BrowserSlot {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|win| win.local_storage().ok().flatten())
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveSlot for BrowserSlot {
    fn read(&self) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(SAVE_KEY).ok().flatten())
    }

    fn write(&mut self, data: &str) -> Result<(), SaveError> {
        let storage = Self::storage().ok_or(SaveError::Unavailable)?;
        storage
            .set_item(SAVE_KEY, data)
            .map_err(|err| SaveError::Write(format!("{err:?}")))
    }

    fn clear(&mut self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(SAVE_KEY);
        }
    }
}

pub fn save_session<S: SaveSlot + ?Sized>(slot: &mut S, session: &GameSession) -> Result<(), SaveError> {
    let encoded = serde_json::to_string(session)?;
    slot.write(&encoded)
}

/// Loads the saved game. Missing data yields `None`; unreadable or
/// inconsistent data is purged and also yields `None`.
pub fn load_session<S: SaveSlot + ?Sized>(slot: &mut S) -> Option<GameSession> {
    let raw = slot.read()?;
    let session = match serde_json::from_str::<GameSession>(&raw) {
        Ok(session) => session,
        Err(err) => {
            log::warn!("discarding unreadable save: {err}");
            slot.clear();
            return None;
        }
    };
    if let Err(err) = session.check_integrity() {
        log::warn!("discarding inconsistent save: {err}");
        slot.clear();
        return None;
    }
    Some(session)
}

pub fn has_save<S: SaveSlot + ?Sized>(slot: &S) -> bool {
    slot.read().is_some()
}

pub fn delete_save<S: SaveSlot + ?Sized>(slot: &mut S) {
    slot.clear();
}

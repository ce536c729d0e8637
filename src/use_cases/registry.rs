// Session orchestration for spawning and managing simulation worlds.

use crate::domain::systems::control::ClassifierFrame;
use crate::domain::tuning::GameTuning;
use crate::domain::{LevelTemplate, SimError};
use crate::use_cases::game::world_task;
use crate::use_cases::session::Session;
use crate::use_cases::{GameEvent, SessionState, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast, mpsc, watch};
use tracing::info;

/// Shared configuration for spawning session worlds.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Capacity for inbound session commands.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
}

/// Errors returned by session registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Session already exists and cannot be re-created.
    AlreadyExists,
    /// The simulation refused to start.
    Sim(SimError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyExists => write!(f, "session already exists"),
            RegistryError::Sim(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<SimError> for RegistryError {
    fn from(e: SimError) -> Self {
        RegistryError::Sim(e)
    }
}

/// Per-session channels.
#[derive(Clone)]
pub struct SessionHandle {
    /// Identifier clients use to target this session.
    pub session_id: Arc<str>,
    /// Sender for commands into the session world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Latest classifier frame; the tick loop reads it without blocking.
    pub classifier_tx: watch::Sender<Option<ClassifierFrame>>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Watch sender for session phase changes.
    pub session_state_tx: watch::Sender<SessionState>,
    /// Stops the world task.
    pub shutdown: Arc<Notify>,
    pub level_count: usize,
}

/// Thread-safe registry for active sessions.
pub struct SessionRegistry {
    /// Global settings applied to newly created sessions.
    settings: SessionSettings,
    levels: Arc<[LevelTemplate]>,
    tuning: GameTuning,
    /// Map of session id to active handle.
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates a new registry; every session plays `levels` with `tuning`.
    pub fn new(settings: SessionSettings, levels: Arc<[LevelTemplate]>, tuning: GameTuning) -> Self {
        Self {
            settings,
            levels,
            tuning,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new session and spawns its world task.
    pub async fn create_session(&self, session_id: String) -> Result<SessionHandle, RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return Err(RegistryError::AlreadyExists);
        }

        let session = Session::new(
            Arc::clone(&self.levels),
            self.tuning.clone(),
            self.settings.tick_interval,
        )?;
        let initial_state = session.state();

        // Channel wiring for the session world loop.
        let (input_tx, input_rx) =
            mpsc::channel::<GameEvent>(self.settings.input_channel_capacity);
        let (classifier_tx, classifier_rx) = watch::channel::<Option<ClassifierFrame>>(None);
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(self.settings.world_broadcast_capacity);
        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.world_broadcast_capacity);
        let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let (session_state_tx, _session_state_rx) = watch::channel::<SessionState>(initial_state);
        let shutdown = Arc::new(Notify::new());

        // Spawn the authoritative world loop for this session.
        tokio::spawn(world_task(
            input_rx,
            classifier_rx,
            world_tx.clone(),
            session_state_tx.clone(),
            self.settings.tick_interval,
            shutdown.clone(),
            session,
        ));

        let handle = SessionHandle {
            session_id: Arc::from(session_id.as_str()),
            input_tx,
            classifier_tx,
            world_tx,
            world_bytes_tx,
            world_latest_tx,
            session_state_tx,
            shutdown,
            level_count: self.levels.len(),
        };

        info!(session_id = %session_id, "session created");
        sessions.insert(session_id, handle.clone());
        Ok(handle)
    }

    /// Returns a session handle for the provided id, if it exists.
    pub async fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Removes a session and stops its world task. Returns false if it did not exist.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(handle) => {
                handle.shutdown.notify_one();
                info!(session_id, "session removed");
                true
            }
            None => false,
        }
    }
}

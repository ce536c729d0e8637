// Use cases layer: application workflows for the simulation server.

pub mod game;
pub mod registry;
pub mod session;
pub mod types;

pub use registry::{RegistryError, SessionHandle, SessionRegistry, SessionSettings};
pub use session::{Phase, Session, SessionStatus};
pub use types::{GameEvent, SessionState, WorldUpdate};

use crate::use_cases::SessionRegistry;
use std::sync::Arc;

pub struct AppState {
    // Owns the set of active session world tasks.
    pub session_registry: Arc<SessionRegistry>,
    // Session clients attach to when they do not name one.
    pub default_session_id: Arc<str>,
}

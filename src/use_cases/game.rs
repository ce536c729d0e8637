use super::session::Session;
use super::types::{GameEvent, SessionState, WorldUpdate};
use crate::domain::systems::control::{ClassifierFrame, ControlFeed, ControlMapper};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, info, warn};

/// Fixed-step loop that owns one session exclusively.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    mut classifier_rx: watch::Receiver<Option<ClassifierFrame>>,
    world_tx: broadcast::Sender<WorldUpdate>,
    session_state_tx: watch::Sender<SessionState>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
    mut session: Session,
) {
    let tuning = session.tuning().clone();
    let mapper = ControlMapper::new(tuning.controls.clone(), tuning.formants, &tuning.player);
    let mut feed = ControlFeed::new(tuning.controls.stale_after_ticks);

    let _ = session_state_tx.send(session.state());

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly when the session is removed.
                info!(level = session.level(), "session world task stopping");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            match ev {
                GameEvent::Commit => session.commit(),
                GameEvent::Restart => session.restart(),
                GameEvent::SelectLevel { level, reply } => {
                    let result = session.select_level(level);
                    if let Err(e) = &result {
                        warn!(error = %e, "level select rejected");
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
            }
        }

        // A closed classifier leaves the last frame in place; it goes stale on its own.
        if classifier_rx.has_changed().unwrap_or(false) {
            if let Some(frame) = classifier_rx.borrow_and_update().clone() {
                feed.push(frame);
            }
        }

        let intent = feed.next_intent(&mapper);
        session.tick(intent);

        let state = session.state();
        session_state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                debug!(?state, "session state changed");
                *current = state;
                true
            }
        });

        let _ = world_tx.send(WorldUpdate {
            tick: session.tick_count(),
            world: session.snapshot(),
            status: session.summary(),
        });
    }
}

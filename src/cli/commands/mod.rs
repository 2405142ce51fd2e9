//! Subcommand implementations

pub mod comment;
pub mod config;
pub mod listen;
pub mod membership;
pub mod page;
pub mod rate;

use anyhow::Result;
use std::time::Instant;

use crate::cli::output::first_modal;
use crate::config::Config;
use crate::session::{Session, SessionEvent};
use crate::state::StateEvent;

/// Process queued input and poll until no request is in flight
pub(crate) async fn drive(session: &mut Session) -> Vec<StateEvent> {
    let mut events = session.process(Instant::now());
    while session.has_pending_work() {
        session.settle().await;
        events.extend(session.process(Instant::now()));
    }
    events
}

/// Load a vehicle page without the push channel
pub(crate) async fn open_page(vehicle_id: u64) -> Result<Session> {
    let mut config = Config::load()?;
    config.notifications.enabled = false;

    let mut session = Session::new(config)?;
    session.push(SessionEvent::Open(vehicle_id));
    let events = drive(&mut session).await;
    if let Some(message) = first_modal(&events) {
        anyhow::bail!("Vehicle {}: {}", vehicle_id, message);
    }
    Ok(session)
}

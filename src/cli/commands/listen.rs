//! Push notification listener

use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::time::Instant;

use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::config::Config;
use crate::session::{Session, SessionEvent};
use crate::state::StateEvent;

#[derive(Serialize)]
struct AlertLine {
    time: String,
    message: String,
}

pub async fn run(count: Option<usize>, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.notifications.enabled = true;

    let mut session = Session::new(config)?;
    session.start()?;
    print_success("Listening for new posts (Ctrl+C to stop)", quiet);

    let mut shown = 0;
    while let Some(frame) = session.next_frame().await {
        session.push(SessionEvent::Frame(frame));
        for event in session.process(Instant::now()) {
            let StateEvent::AlertShown(message) = event else {
                continue;
            };
            let line = AlertLine {
                time: Local::now().format("%H:%M:%S").to_string(),
                message,
            };
            print_formatted(&line, format, |l| format!("[{}] {}", l.time, l.message));

            shown += 1;
            if count.is_some_and(|limit| shown >= limit) {
                return Ok(());
            }
        }
    }

    anyhow::bail!("Notification channel closed")
}

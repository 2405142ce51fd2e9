//! Rating command

use anyhow::Result;

use crate::cli::commands::{drive, open_page};
use crate::cli::output::{OutputFormat, first_modal, print_formatted};
use crate::config::Config;
use crate::rating::Score;
use crate::session::SessionEvent;
use crate::state::StateEvent;

pub async fn run(vehicle: u64, score: u8, format: OutputFormat, quiet: bool) -> Result<()> {
    // Checked before any request goes out
    let messages = Config::load()?.client.locale.messages();
    Score::try_from(score).map_err(|e| anyhow::anyhow!(e.localized(messages)))?;

    let mut session = open_page(vehicle).await?;
    session.push(SessionEvent::Rate(score));
    let events = drive(&mut session).await;

    if let Some(message) = first_modal(&events) {
        anyhow::bail!("{}", message);
    }
    let saved = events.iter().find_map(|e| match e {
        StateEvent::RatingSaved(response) => Some(response.clone()),
        _ => None,
    });
    let Some(saved) = saved else {
        anyhow::bail!("No answer for the rating");
    };

    if quiet && format == OutputFormat::Text {
        return Ok(());
    }
    let messages = session.messages();
    print_formatted(&saved, format, |r| match r.average_label() {
        Some(average) => format!("{} {}", r.summary(messages), average),
        None => r.summary(messages),
    });
    Ok(())
}

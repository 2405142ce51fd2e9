//! Favorite and garage membership commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::commands::{drive, open_page};
use crate::cli::output::{OutputFormat, print_formatted, print_success};
use crate::session::SessionEvent;
use crate::state::StateEvent;
use crate::toggle::ToggleKind;

#[derive(Subcommand, Debug)]
pub enum MembershipCommands {
    /// Show whether the vehicle is a member
    Status {
        /// Vehicle id
        vehicle: u64,
    },

    /// Add the vehicle, or remove it if it is already a member
    Toggle {
        /// Vehicle id
        vehicle: u64,

        /// Answer yes to the removal confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct MembershipResult {
    vehicle: u64,
    kind: ToggleKind,
    member: bool,
    status: String,
}

#[derive(Serialize)]
struct ToggleResult {
    vehicle: u64,
    kind: ToggleKind,
    member: bool,
    succeeded: bool,
    message: String,
}

pub async fn run(
    kind: ToggleKind,
    command: MembershipCommands,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        MembershipCommands::Status { vehicle } => status(kind, vehicle, format).await,
        MembershipCommands::Toggle { vehicle, yes } => toggle(kind, vehicle, yes, format, quiet).await,
    }
}

async fn status(kind: ToggleKind, vehicle: u64, format: OutputFormat) -> Result<()> {
    let session = open_page(vehicle).await?;
    let Some(toggle) = session.toggle(kind) else {
        anyhow::bail!("Vehicle {} page has no {} control", vehicle, kind.name());
    };

    let result = MembershipResult {
        vehicle,
        kind,
        member: toggle.controller().is_member(),
        status: toggle.view().status.to_string(),
    };
    print_formatted(&result, format, |r| r.status.clone());
    Ok(())
}

async fn toggle(
    kind: ToggleKind,
    vehicle: u64,
    yes: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut session = open_page(vehicle).await?;
    if session.toggle(kind).is_none() {
        anyhow::bail!("Vehicle {} page has no {} control", vehicle, kind.name());
    }

    session.push(SessionEvent::Click(kind));
    let mut events = drive(&mut session).await;

    let prompt = events.iter().find_map(|e| match e {
        StateEvent::ConfirmRequested { prompt, .. } => Some(prompt.clone()),
        _ => None,
    });
    if let Some(prompt) = prompt {
        let accepted = yes || confirm(&prompt).await?;
        session.push(SessionEvent::Confirm { kind, accepted });
        events = drive(&mut session).await;
        if !accepted {
            print_success("Cancelled", quiet);
            return Ok(());
        }
    }

    let settled = events.iter().find_map(|e| match e {
        StateEvent::Toggled { result, .. } => Some(result.clone()),
        _ => None,
    });
    let Some(settled) = settled else {
        anyhow::bail!("No answer for the {} request", kind.name());
    };

    if !settled.succeeded {
        anyhow::bail!("{}", settled.message);
    }

    let result = ToggleResult {
        vehicle,
        kind,
        member: settled.member,
        succeeded: settled.succeeded,
        message: settled.message,
    };
    if !quiet || format == OutputFormat::Json {
        print_formatted(&result, format, |r| r.message.clone());
    }
    Ok(())
}

/// Ask a yes/no question on the terminal
async fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{} [y/N] ", prompt).as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

//! Vehicle page inspection

use anyhow::Result;
use serde::Serialize;

use crate::cli::commands::open_page;
use crate::cli::output::{OutputFormat, print_formatted, print_status};
use crate::toggle::ToggleKind;

#[derive(Serialize)]
struct ControlEntry {
    kind: ToggleKind,
    member: bool,
    label: String,
    status: String,
}

#[derive(Serialize)]
struct PageResult {
    vehicle: u64,
    title: Option<String>,
    csrf_token: bool,
    controls: Vec<ControlEntry>,
}

pub async fn run(vehicle: u64, format: OutputFormat, _quiet: bool) -> Result<()> {
    let session = open_page(vehicle).await?;
    let markup = session.page().markup.as_ref();

    let result = PageResult {
        vehicle,
        title: markup.and_then(|m| m.title.clone()),
        csrf_token: markup.is_some_and(|m| m.csrf_token.is_some()),
        controls: session
            .toggles()
            .iter()
            .map(|t| {
                let view = t.view();
                ControlEntry {
                    kind: t.kind(),
                    member: t.controller().is_member(),
                    label: view.label.to_string(),
                    status: view.status.to_string(),
                }
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => print_formatted(&result, format, |_| String::new()),
        OutputFormat::Text => {
            println!(
                "Vehicle {}: {}",
                result.vehicle,
                result.title.as_deref().unwrap_or("(untitled)")
            );
            print_status(result.csrf_token, "Anti-forgery token in page");
            for control in &result.controls {
                print_status(control.member, &format!("{} - {}", control.label, control.status));
            }
            if result.controls.is_empty() {
                println!("No membership controls on this page");
            }
        }
    }
    Ok(())
}

// Hide console window in release builds when no subcommand is given
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cli;
mod comment;
mod config;
mod dispatch;
mod i18n;
mod markup;
mod notify;
mod rating;
mod session;
mod state;
mod task;
#[cfg(test)]
mod testing;
mod toggle;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "motry=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(command) = cli.command {
        if let Err(e) = cli::run(command, &cli.output).await {
            cli::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
        return Ok(());
    }

    tracing::info!("Starting Motry");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([720.0, 760.0])
        .with_min_inner_size([480.0, 420.0])
        .with_title("Motry");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        "Motry",
        native_options,
        Box::new(|cc| {
            let app = app::MotryApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::load_client_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::app::BlogApp;

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "Desktop blog client")]
struct Args {
    /// Base URL of the blog server. Overrides client.toml and environment.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_client_settings().context("failed to load client settings")?;
    if let Some(raw) = args.server_url.as_deref() {
        settings = settings.with_server_url(raw)?;
    }
    let server_label = settings.server_url.to_string();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Crypto Blog")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([520.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Crypto Blog",
        options,
        Box::new(|_cc| Ok(Box::new(BlogApp::new(cmd_tx, ui_rx, server_label)))),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_flag_is_optional() {
        let args = Args::try_parse_from(["desktop_gui"]).expect("parse");
        assert!(args.server_url.is_none());

        let args = Args::try_parse_from(["desktop_gui", "--server-url", "http://blog.local:9000"])
            .expect("parse");
        assert_eq!(args.server_url.as_deref(), Some("http://blog.local:9000"));
    }
}

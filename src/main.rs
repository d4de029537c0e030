//! GitHub contribution display appliance
//!
//! Renders a user's recent contribution calendar on a 16x7 RGB LED matrix,
//! refreshing on a timer. Buttons adjust brightness (A/X up, B/Y down) and
//! A+B forces an immediate refresh.
//!
//! Environment variables:
//! - GITHUB_TOKEN: personal access token with read:user scope (required)
//! - GITHUB_USERNAME: user whose calendar to display (required)
//! - POLL_INTERVAL_SECS: refresh cadence, default 900
//! - DEFAULT_BRIGHTNESS: fallback brightness 0.0-1.0, default 1.0
//! - BRIGHTNESS_FILE: persisted brightness path, default brightness.txt
//! - WIFI_SSID / WIFI_PASS: for sessions that manage the radio themselves

mod app;
mod config;
mod error;
mod github;
mod grid;
mod input;
mod matrix;
mod net;
mod render;
mod sim;
mod store;

use crate::app::App;
use crate::config::Config;
use crate::net::HostProbe;
use crate::sim::{SimMatrix, SimPad};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    // Terminal-backed surface and buttons; a hardware build swaps in its
    // own Matrix/ButtonPad implementations here.
    let matrix = SimMatrix::new();
    let pad = SimPad::spawn();
    let session = HostProbe::github();

    App::new(matrix, pad, session, config).run().await;
}

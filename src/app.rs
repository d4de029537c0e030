//! Orchestrator: the appliance's runtime control loop
//!
//! Drives connect → fetch → parse → render → wait forever. Every failure is
//! recoverable; the loop never terminates. Brightness and the current grid
//! are owned here - there is no ambient mutable state.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::config::Config;
use crate::github;
use crate::grid::ContributionGrid;
use crate::input::{self, ButtonPad};
use crate::matrix::Matrix;
use crate::net::{self, NetworkSession};
use crate::render;
use crate::store::{Brightness, BrightnessStore};

/// Cadence of button sampling during the wait phase
const POLL_TICK: Duration = Duration::from_millis(100);
/// Hold-off after a brightness adjustment so one press reads as one step
const ADJUST_DEBOUNCE: Duration = Duration::from_millis(200);
/// Cooldown before retrying a failed network association
const RETRY_COOLDOWN: Duration = Duration::from_secs(10);

pub struct App<M, P, N> {
    matrix: M,
    pad: P,
    session: N,
    store: BrightnessStore,
    client: Client,
    config: Config,
    brightness: Brightness,
    /// The grid currently on the display; kept across fetch failures
    grid: Option<ContributionGrid>,
}

impl<M, P, N> App<M, P, N>
where
    M: Matrix,
    P: ButtonPad,
    N: NetworkSession,
{
    pub fn new(matrix: M, pad: P, session: N, config: Config) -> Self {
        let store = BrightnessStore::new(config.brightness_file.clone(), config.default_brightness);
        let brightness = store.load();
        Self {
            matrix,
            pad,
            session,
            store,
            client: Client::new(),
            config,
            brightness,
            grid: None,
        }
    }

    /// Run until process termination
    pub async fn run(&mut self) {
        tracing::info!(
            user = %self.config.github_username,
            poll_interval = ?self.config.poll_interval,
            "github contribution display starting"
        );
        tracing::info!("buttons: A/X = brighter, B/Y = dimmer, A+B = refresh");

        render::startup_animation(&mut self.matrix, self.brightness).await;

        loop {
            if !net::ensure_connected(
                &mut self.session,
                &mut self.matrix,
                &self.config.wifi_ssid,
                &self.config.wifi_password,
            )
            .await
            {
                tracing::warn!("network unavailable, retrying in {:?}", RETRY_COOLDOWN);
                sleep(RETRY_COOLDOWN).await;
                continue;
            }

            self.refresh().await;

            tracing::info!("next update in {:?}", self.config.poll_interval);
            if self.grid.is_some() {
                if self.wait_for_next_poll(self.config.poll_interval).await {
                    tracing::info!("force refresh requested");
                    continue;
                }
            } else {
                // Nothing on the display worth re-rendering or refreshing
                // early; just sit out the interval.
                sleep(self.config.poll_interval).await;
            }
        }
    }

    /// One fetch-parse-render cycle.
    ///
    /// On failure the previous grid stays both in memory and on the
    /// display; only the status pixel changes.
    async fn refresh(&mut self) {
        render::show_fetching(&mut self.matrix);

        match github::fetch_contributions(
            &self.client,
            &self.config.github_token,
            &self.config.github_username,
        )
        .await
        {
            Ok(calendar) => {
                let grid = ContributionGrid::from_calendar(&calendar);
                render::render(&mut self.matrix, &grid, self.brightness);
                self.grid = Some(grid);
                tracing::info!("display updated");
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed, keeping previous grid");
                render::show_error(&mut self.matrix);
            }
        }
    }

    /// Wait out the poll interval while servicing buttons.
    ///
    /// Samples every 0.1s. Returns true the moment the force-refresh chord
    /// is seen (after waiting for its release); brightness adjustments
    /// re-render the current grid and debounce before polling resumes. The
    /// debounce hold-off does not count toward the elapsed wait.
    async fn wait_for_next_poll(&mut self, total: Duration) -> bool {
        let mut elapsed = Duration::ZERO;

        while elapsed < total {
            if input::chord_held(&self.pad) {
                // Debounce: wait for both buttons to be released
                while input::chord_held(&self.pad) {
                    sleep(POLL_TICK).await;
                }
                return true;
            }

            if let Some(delta) = input::poll_adjustment(&self.pad) {
                self.brightness = self.brightness.adjusted(delta);
                tracing::info!("brightness: {}", self.brightness);
                self.store.save(self.brightness);
                if let Some(grid) = &self.grid {
                    render::render(&mut self.matrix, grid, self.brightness);
                }
                sleep(ADJUST_DEBOUNCE).await;
            }

            sleep(POLL_TICK).await;
            elapsed += POLL_TICK;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::matrix::fake::FakeMatrix;
    use crate::net::NetworkSession;
    use async_trait::async_trait;
    use std::cell::Cell;

    /// Pad that reports `mask` buttons held for the first `held_for`
    /// queries, then released
    struct ScriptPad {
        mask: &'static [Button],
        held_for: u32,
        queries: Cell<u32>,
    }

    impl ScriptPad {
        fn held(mask: &'static [Button], held_for: u32) -> Self {
            Self {
                mask,
                held_for,
                queries: Cell::new(0),
            }
        }

        fn idle() -> Self {
            Self::held(&[], 0)
        }
    }

    impl ButtonPad for ScriptPad {
        fn is_pressed(&self, button: Button) -> bool {
            let n = self.queries.get();
            self.queries.set(n + 1);
            n < self.held_for && self.mask.contains(&button)
        }
    }

    struct OfflineSession;

    #[async_trait]
    impl NetworkSession for OfflineSession {
        async fn is_connected(&self) -> bool {
            false
        }
        async fn connect(&mut self, _ssid: &str, _password: &str) {}
    }

    fn test_config(name: &str, default_brightness: f32) -> Config {
        Config {
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            github_token: "token".into(),
            github_username: "user".into(),
            poll_interval: Duration::from_secs(900),
            default_brightness: Brightness::new(default_brightness),
            brightness_file: std::env::temp_dir().join(format!(
                "contrib-display-app-{}-{}.txt",
                std::process::id(),
                name
            )),
        }
    }

    fn test_app(pad: ScriptPad, config: Config) -> App<FakeMatrix, ScriptPad, OfflineSession> {
        let _ = std::fs::remove_file(&config.brightness_file);
        App::new(FakeMatrix::new(), pad, OfflineSession, config)
    }

    #[tokio::test(start_paused = true)]
    async fn chord_ends_wait_immediately_without_adjustment() {
        let pad = ScriptPad::held(&[Button::A, Button::B], 6);
        let mut app = test_app(pad, test_config("chord", 0.5));
        app.grid = Some(ContributionGrid::default());

        let refreshed = app.wait_for_next_poll(Duration::from_secs(900)).await;

        assert!(refreshed);
        // The chord must not have been read as a brightness press
        assert_eq!(app.brightness, Brightness::new(0.5));
        // No re-render happened during the wait
        assert_eq!(app.matrix.flushes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn brightness_press_adjusts_persists_and_rerenders() {
        let pad = ScriptPad::held(&[Button::A], 3);
        let mut app = test_app(pad, test_config("brighten", 0.5));
        app.grid = Some(ContributionGrid::default());

        let refreshed = app.wait_for_next_poll(Duration::from_secs(1)).await;

        assert!(!refreshed);
        assert!((app.brightness.value() - 0.6).abs() < 1e-6);
        // Persisted after the mutation
        assert_eq!(app.store.load(), app.brightness);
        // Current grid was redrawn with the new brightness
        assert_eq!(app.matrix.flushes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn decrease_saturates_at_floor() {
        let pad = ScriptPad::held(&[Button::Y], 6);
        let mut app = test_app(pad, test_config("floor", 0.1));
        app.grid = Some(ContributionGrid::default());

        app.wait_for_next_poll(Duration::from_secs(1)).await;

        assert_eq!(app.brightness, Brightness::new(0.1));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_wait_runs_to_completion() {
        let mut app = test_app(ScriptPad::idle(), test_config("idle", 1.0));
        app.grid = Some(ContributionGrid::default());

        let refreshed = app.wait_for_next_poll(Duration::from_secs(2)).await;

        assert!(!refreshed);
        assert_eq!(app.matrix.flushes, 0);
    }
}

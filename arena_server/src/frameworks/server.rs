// Framework bootstrap for the headless arena runtime.

use crate::frameworks::config;
use crate::interface_adapters::relay::{change_relay, scoreboard_relay};
use crate::use_cases::{ActionSender, Game, GameRuntime, GameSettings, GameTasks, spawn_game};

use std::{io::Result, sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Handles the transport layer needs once the core is running.
pub struct Arena {
    pub game: Arc<Game>,
    pub actions: ActionSender,
    pub observers: broadcast::Sender<Arc<str>>,
    pub tasks: GameTasks,
    scoreboard: JoinHandle<()>,
}

impl Arena {
    /// Stops the game loops and the scoreboard publisher.
    pub fn shutdown(self) {
        self.tasks.shutdown();
        self.scoreboard.abort();
    }
}

/// Starts the game loops and the relays that fan changes and scores out to observers.
pub fn start(
    settings: GameSettings,
    observer_capacity: usize,
    scoreboard_period: Duration,
) -> Arena {
    let (observers, _observers_rx) = broadcast::channel::<Arc<str>>(observer_capacity);
    let GameRuntime {
        game,
        actions,
        changes,
        tasks,
    } = spawn_game(settings);

    // The relay is the only consumer of the single-slot feed.
    tokio::spawn(change_relay(changes, observers.clone()));
    let scoreboard = tokio::spawn(scoreboard_relay(
        game.clone(),
        observers.clone(),
        scoreboard_period,
    ));

    Arena {
        game,
        actions,
        observers,
        tasks,
        scoreboard,
    }
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = config::game_settings();
    tracing::debug!(
        authoritative = settings.authoritative,
        tick_ms = settings.tick_interval.as_millis() as u64,
        laser_range = settings.tuning.laser_range,
        "configuration loaded"
    );
    let arena = start(
        settings,
        config::observer_capacity(),
        config::scoreboard_period(),
    );
    tracing::info!("arena ready");

    tokio::signal::ctrl_c().await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    })?;

    tracing::info!("shutting down");
    arena.shutdown();
    Ok(())
}

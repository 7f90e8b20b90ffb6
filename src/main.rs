mod api;
mod common;
mod config;
mod network;
mod session;
mod state;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::{mpsc, watch};

use api::ApiClient;
use common::NetworkCommand;
use network::{BackendClient, Dispatcher, new_channel};
use session::Session;
use ui::{AppState, SkillSwapApp};

#[derive(Parser)]
#[command(
    name = "skillswap-client",
    version,
    about = "Desktop client for the SkillSwap exchange platform"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Backend base URL, overriding the config file
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(url) = cli.server_url {
        app_config.server_url = url;
    }

    // A stored token restores the session without a fresh login.
    let session = app_config
        .token
        .as_deref()
        .and_then(Session::from_token);
    let initial_user = session.as_ref().map(|s| s.username.clone());

    let api = ApiClient::new(app_config.server_url.clone(), app_config.token.clone());

    // UI -> network task
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network task -> UI
    let (event_tx, event_rx) = mpsc::channel(100);
    // Active session's username; gates the real-time channel.
    let (user_tx, user_rx) = watch::channel(initial_user);

    let dispatcher = Dispatcher::new();
    let (realtime, channel_task) = new_channel(dispatcher);

    let ws_base = app_config.ws_url();
    tokio::spawn(async move {
        channel_task.run(ws_base, user_rx).await;
    });
    tokio::spawn(async move {
        BackendClient::new(api, event_tx, cmd_rx, user_tx).run().await;
    });

    if session.is_some() {
        // Seed the restored session's pages before the first frame.
        let _ = cmd_tx.send(NetworkCommand::LoadDashboard).await;
        let _ = cmd_tx.send(NetworkCommand::LoadNotifications).await;
    }

    let mut state = AppState::new(session, app_config.dark_mode);
    if state.session.is_some() {
        state.dashboard.begin_load();
        state.notifications.loading = true;
    }

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let mut state = Some(state);
    let config_path = cli.config.clone();

    eframe::run_native(
        "SkillSwap",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("SkillSwapApp should only be initialized once");
            let state = state
                .take()
                .expect("SkillSwapApp should only be initialized once");

            log::info!("Client started against {}", app_config.server_url);

            Ok(Box::new(SkillSwapApp::new(
                cc,
                state,
                cmd_tx.clone(),
                event_receiver,
                realtime.clone(),
                config_path.clone(),
            )))
        }),
    )
}

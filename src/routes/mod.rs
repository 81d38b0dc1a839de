use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use yurline_maps::MapProvider;
use yurline_telegram::ContactNotifier;

use crate::config::Config;

mod contact;
mod health;
mod map;

pub use contact::RelayInput;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` until both bot token and chat id are configured.
    pub notifier: Option<ContactNotifier>,
    pub maps: Arc<dyn MapProvider>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notifier = config.notifier();
        let maps = config.map_provider();

        Self {
            config,
            notifier,
            maps,
        }
    }

    pub fn with_maps(mut self, maps: Arc<dyn MapProvider>) -> Self {
        self.maps = maps;
        self
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/contact", post(contact::send_telegram_message))
        .route("/api/office-map", get(map::office_map))
        .with_state(app_state)
}

pub mod backend;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;
pub mod views;

use std::sync::Arc;

use backend::BookingBackend;
use booking::WizardSessions;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BookingBackend>,
    pub sessions: WizardSessions,
    pub config: Config,
}

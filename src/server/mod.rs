mod handlers;
mod models;

pub use handlers::run_server;

use crate::providers::GoogleWeb;
use crate::settings::Settings;

#[derive(Clone)]
pub(crate) struct ServerState {
    pub(crate) settings: Settings,
    pub(crate) backend: GoogleWeb,
}

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::logbuf::LogBuffer;
use crate::services::repository::BookingRepository;

pub struct AppState {
    /// Both handles are None when no DATABASE_URL is configured; the public
    /// intake then degrades per config and admin data routes answer 503.
    pub db: Option<Arc<Mutex<Connection>>>,
    pub repo: Option<Box<dyn BookingRepository>>,
    pub config: AppConfig,
    pub identity: Box<dyn IdentityProvider>,
    pub logs: LogBuffer,
}

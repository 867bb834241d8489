use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::store::Store;
use crate::infrastructure::queue::dispatcher::JobDispatcher;
use crate::infrastructure::queue::JobQueue;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Arc<dyn Store>,
    pub queue: Arc<dyn JobQueue>,
    pub dispatcher: JobDispatcher,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Arc<dyn Store>,
        queue: Arc<dyn JobQueue>,
        dispatcher: JobDispatcher,
    ) -> Self {
        Self {
            config,
            db,
            queue,
            dispatcher,
        }
    }
}

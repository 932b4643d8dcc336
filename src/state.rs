use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::Config,
    database::{MemoryStore, NoteStore, RedisStore},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn NoteStore>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store: Arc<dyn NoteStore> = match &config.redis_url {
            Some(url) => {
                info!("Connecting to redis...");
                Arc::new(RedisStore::connect(url).await)
            }
            None => {
                warn!("REDIS_URL not set, notes are stored in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        Arc::new(Self { config, store })
    }

    pub fn with_store(config: Config, store: Arc<dyn NoteStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}

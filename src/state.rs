use std::sync::Arc;

use super::{
    config::Config,
    database::{RedisDishStore, RedisOrderStore, init_redis},
    store::{DishStore, OrderStore},
};

/// Shared handles injected into every handler. The stores are trait objects
/// so tests can swap in the in-memory implementations without a Redis.
#[derive(Clone)]
pub struct AppState {
    pub dishes: Arc<dyn DishStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl AppState {
    pub async fn new(config: &Config) -> Self {
        let conn = init_redis(&config.redis_url).await;

        Self {
            dishes: Arc::new(RedisDishStore::new(conn.clone())),
            orders: Arc::new(RedisOrderStore::new(conn)),
        }
    }

    pub fn with_stores(dishes: Arc<dyn DishStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self { dishes, orders }
    }
}

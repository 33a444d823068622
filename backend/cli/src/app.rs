//! Wiring of stores, use-cases and gateway state from the loaded config.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use rsvp_config::Config;
use rsvp_core::{CounterStore, RsvpRepository};
use rsvp_gateway::{AdminCredentials, AppState, RateLimitPolicy, RateLimiter};
use rsvp_storage::{
    InMemoryCounterStore, InMemoryRsvpStore, MongoRsvpStore, MongoSettings, RedisCounterStore,
};
use rsvp_usecase::RsvpUsecase;

pub async fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let repo = repository(config).await?;
    let counters = counter_store(config).await?;

    let policy = RateLimitPolicy {
        max_requests: config.rate_limit.max_requests,
        window: config.rate_limit.window(),
        key_prefix: config.rate_limit.key_prefix.clone(),
    };

    Ok(Arc::new(AppState {
        usecase: Arc::new(RsvpUsecase::new(repo)),
        rate_limiter: Arc::new(RateLimiter::new(counters, policy)),
        credentials: Arc::new(AdminCredentials::new(
            config.admin.username.clone(),
            config.admin.password.clone(),
        )),
    }))
}

async fn repository(config: &Config) -> Result<Arc<dyn RsvpRepository>> {
    if config.is_test() {
        info!("Using in-memory RSVP store");
        return Ok(Arc::new(InMemoryRsvpStore::new()));
    }

    let db = &config.database;
    let settings = MongoSettings {
        host: db.host.clone(),
        database: db.name.clone(),
        username: db.username.clone(),
        password: db.password.clone(),
        pool_size: db.pool,
        connect_timeout: db.connect_timeout(),
    };
    let store = MongoRsvpStore::connect(&settings)
        .await
        .context("failed to connect to the document store")?;
    Ok(Arc::new(store))
}

async fn counter_store(config: &Config) -> Result<Arc<dyn CounterStore>> {
    match (&config.redis.address, config.is_test()) {
        (Some(address), _) => {
            let store = RedisCounterStore::connect(address, config.redis.timeout())
                .await
                .context("failed to connect to the counter store")?;
            Ok(Arc::new(store))
        }
        (None, true) => {
            info!("Using in-memory rate-limit counters");
            Ok(Arc::new(InMemoryCounterStore::new()))
        }
        (None, false) => anyhow::bail!("REDIS_HOST is required outside the test environment"),
    }
}

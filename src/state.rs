use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kxl_auth::{Authenticator, RateLimiter, RbacService, SessionStore};
use kxl_cache::{KeyValueStore, RedisCache};
use kxl_config::Config;
use kxl_db::{
    PgPrincipalRepository, PgRolePermissionRepository, PrincipalRepository,
    RolePermissionRepository, init_db_pool,
};
use tracing::info;

/// Deadline for the startup Redis `PING`.
const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Everything a handler can reach. Cheap to clone; backends sit behind
/// trait objects so tests can swap in in-memory ones.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub principals: Arc<dyn PrincipalRepository>,
    pub roles: Arc<dyn RolePermissionRepository>,
    pub store: Arc<dyn KeyValueStore>,
    pub sessions: SessionStore,
    pub rbac: RbacService,
    pub rate_limiter: RateLimiter,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(
        config: Config,
        principals: Arc<dyn PrincipalRepository>,
        roles: Arc<dyn RolePermissionRepository>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let sessions = SessionStore::new(store.clone(), &config.session);
        let rbac = RbacService::new(
            roles.clone(),
            store.clone(),
            Duration::from_secs(config.security.rbac_cache_ttl_seconds),
        );
        let rate_limiter = RateLimiter::from_config(store.clone(), &config.security);
        let authenticator = Authenticator::new(sessions.clone(), principals.clone(), rbac.clone());

        Self {
            config: Arc::new(config),
            principals,
            roles,
            store,
            sessions,
            rbac,
            rate_limiter,
            authenticator,
        }
    }
}

/// Connects Postgres and Redis, applies migrations and wires the services.
///
/// # Errors
///
/// Fails when either backend is unreachable; Redis must answer `PING`
/// within two seconds.
pub async fn init_app_state(config: Config) -> anyhow::Result<AppState> {
    let pool = init_db_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    kxl_db::MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database migrations applied");

    let redis = RedisCache::connect(&config.redis.connection_url(), REDIS_CONNECT_TIMEOUT)
        .await
        .context("Failed to connect to Redis")?;
    info!("Redis connection ready");

    Ok(AppState::new(
        config,
        Arc::new(PgPrincipalRepository::new(pool.clone())),
        Arc::new(PgRolePermissionRepository::new(pool)),
        Arc::new(redis),
    ))
}

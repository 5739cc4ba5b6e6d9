//! Shared server state

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::models::hash_password;
use crate::db::DbService;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    /// Prepare the work directory, open the database, and make sure an
    /// admin account exists.
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db_path = config.database_path();
        let pool = DbService::connect(&db_path).await?;
        tracing::info!(path = %db_path.display(), "database ready");

        ensure_default_admin(&pool, config.is_production()).await?;

        Ok(Self {
            config: Arc::new(config),
            pool,
            jwt: Arc::new(JwtService::new()),
        })
    }

    /// Test constructor: in-memory database, fixed JWT config.
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        use crate::auth::jwt::JwtConfig;

        let pool = DbService::connect_memory().await.unwrap();
        Self {
            config: Arc::new(Config::default()),
            pool,
            jwt: Arc::new(JwtService::with_config(JwtConfig {
                secret: "state-test-secret".to_string(),
                expiration_minutes: 60,
                issuer: "campus-server".to_string(),
                audience: "campus-clients".to_string(),
            })),
        }
    }
}

/// Create the bootstrap admin when the staff table is empty.
///
/// Password comes from `DEFAULT_ADMIN_PASSWORD`; in development a
/// well-known fallback is used so a fresh checkout can log in.
async fn ensure_default_admin(pool: &SqlitePool, is_production: bool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let password = match std::env::var("DEFAULT_ADMIN_PASSWORD") {
        Ok(p) if !p.trim().is_empty() => p,
        _ if is_production => {
            anyhow::bail!("staff table is empty and DEFAULT_ADMIN_PASSWORD is not set")
        }
        _ => "admin123".to_string(),
    };

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.message))?;
    sqlx::query(
        "INSERT INTO staff (id, username, password_hash, display_name, role, branch_id, is_active, created_at) \
         VALUES (?1, ?2, ?3, ?4, 'admin', NULL, 1, ?5)",
    )
    .bind(snowflake_id())
    .bind("admin")
    .bind(&hash)
    .bind("Administrator")
    .bind(now_millis())
    .execute(pool)
    .await?;

    tracing::warn!("created default admin account 'admin'; change its password");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_admin_is_created_once() {
        let pool = DbService::connect_memory().await.unwrap();
        ensure_default_admin(&pool, false).await.unwrap();
        ensure_default_admin(&pool, false).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let role: String = sqlx::query_scalar("SELECT role FROM staff LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(role, "admin");
    }
}

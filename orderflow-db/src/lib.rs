//! Database lifecycle management shared by all three services.
//!
//! Provides migration running and a connectivity/status check. All
//! three binaries run `orderflow_db::migrate` once at start-up before
//! handing the pool to their own repositories and dispatchers.

use sqlx::{PgPool, Row};
use tracing::{info, warn};

/// Result type for DB lifecycle operations.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Run all pending migrations from the workspace-root `migrations/`
/// directory. Idempotent: safe to run on every process start.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    info!("running database migrations");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("migrations completed successfully");
    Ok(())
}

/// Check database connectivity and print recent migration history.
pub async fn status(pool: &PgPool) -> Result<()> {
    let result: i64 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    if result != 1 {
        return Err(anyhow::anyhow!("database connectivity check failed"));
    }
    info!("database connectivity: OK");

    let rows = sqlx::query(
        r#"
        SELECT version, description, success
        FROM _sqlx_migrations
        ORDER BY version DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await;

    match rows {
        Ok(migs) if !migs.is_empty() => {
            info!("latest migrations:");
            for mig in migs {
                let version: i64 = mig.get("version");
                let description: String = mig.get("description");
                let success: bool = mig.get("success");
                let mark = if success { "ok" } else { "FAILED" };
                info!("  [{}] v{}: {}", mark, version, description);
            }
        }
        Ok(_) => warn!("no migrations recorded yet (run migrate first)"),
        Err(e) if e.to_string().contains("_sqlx_migrations") => {
            warn!("migration table not found (run migrate first)");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

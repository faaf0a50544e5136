//! CLI command implementations.
//!
//! Every command loads [`CrmConfig`] from the environment, opens the
//! configured store, and then drives the same library functions the
//! scheduler daemon runs.

use sqlx::SqlitePool;

use copperline_crm::config::CrmConfig;
use copperline_crm::db;

pub mod jobs;
pub mod run;
pub mod seed;

/// Load configuration and open the store with the schema applied.
async fn open_store() -> Result<(CrmConfig, SqlitePool), Box<dyn std::error::Error>> {
    let config = CrmConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;
    Ok((config, pool))
}

//! # estoque-app: Action Layer for Estoque
//!
//! What the presentation layer calls: product and sale actions, the errors
//! they return and the view invalidations they publish.
//!
//! ## Module Organization
//! ```text
//! estoque_app/
//! ├── lib.rs          ◄─── You are here (logging & database bootstrap)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── config.rs   ◄─── AppConfig (env overrides)
//! │   └── invalidation.rs ◄─ ViewInvalidator (broadcast)
//! ├── actions/
//! │   ├── mod.rs      ◄─── Action exports
//! │   ├── product.rs  ◄─── Product form and lookups
//! │   └── sale.rs     ◄─── Sale upsert, delete and lookups
//! └── error.rs        ◄─── API error type for actions
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! let config = AppConfig::from_env();
//! estoque_app::init_tracing(&config);
//!
//! let db = estoque_app::open_database(&config).await?;
//! let views = ViewInvalidator::default();
//!
//! let mut rx = views.subscribe();   // presentation layer refetches on each tag
//! let res = actions::sale::upsert_sale(&db, &views, request).await?;
//! ```

pub mod actions;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use estoque_db::{Database, DbError};

pub use error::{ApiError, ErrorCode};
pub use state::{AppConfig, DbState, ViewInvalidator, ViewTag};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set, e.g. `RUST_LOG=estoque_db=trace`
/// - Otherwise `config.log_filter` (`ESTOQUE_LOG`, default
///   `info,estoque=debug,sqlx=warn`)
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(state::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Opens (creating if needed) the database and runs pending migrations.
pub async fn open_database(config: &AppConfig) -> Result<DbState, DbError> {
    if let Some(dir) = config.database_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| {
                DbError::ConnectionFailed(format!("{}: {}", dir.display(), e))
            })?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    info!(path = %config.database_path.display(), "Database ready");

    Ok(DbState::new(db))
}

//! # State Module
//!
//! Long-lived state shared by the actions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │ ViewInvalidator  │  │    AppConfig     │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  broadcast of    │  │  database path   │          │
//! │  │  (SQLite     │  │  ViewTag after   │  │  pool size       │          │
//! │  │   pool)      │  │  each commit     │  │  log filter      │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  Each action takes only the state it needs.                            │
//! │  • DbState: Database has an internal connection pool (thread-safe)     │
//! │  • ViewInvalidator: cloneable sender, any number of subscribers        │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod invalidation;

pub use config::{default_database_path, AppConfig, DEFAULT_LOG_FILTER};
pub use db::DbState;
pub use invalidation::{ViewInvalidator, ViewTag};

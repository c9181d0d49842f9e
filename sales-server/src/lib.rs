//! Sales Server - sales records browsing dashboard backend
//!
//! # Module structure
//!
//! ```text
//! sales-server/src/
//! ├── core/          # configuration, state, server lifecycle
//! ├── api/           # HTTP routes and handlers
//! ├── query/         # filter predicate + sort spec builders (pure)
//! ├── services/      # query service (list / get-by-id / filter options)
//! ├── db/            # connection pool, models, repository
//! └── utils/         # errors, logging, time helpers
//! ```
//!
//! Control flow: api → services → query builders → repository → SQLite.
//! Handlers are stateless; the pool in [`ServerState`] is the only shared
//! resource.

pub mod api;
pub mod core;
pub mod db;
pub mod query;
pub mod services;
pub mod utils;

// Re-export common types
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger;

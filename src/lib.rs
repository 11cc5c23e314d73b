//! catalog-bench: a REST benchmark harness over a two-entity catalog.
//!
//! Categories own items. The category-scoped item listing can run under
//! either of two relation fetch strategies, selected once at startup: a
//! per-row lookup path or a single eager-join path. Both must produce
//! identical responses; the only intended difference is the query shape
//! being benchmarked.
//!
//! The crate is organized the usual way for an axum service:
//!
//! - [`config`]: layered configuration (defaults, TOML, environment)
//! - [`domain`]: entities, DTOs, and pure mapping
//! - [`repository`]: async repository traits plus Postgres and in-memory
//!   implementations
//! - [`service`]: CRUD services; [`service::ItemService`] carries the
//!   fetch-strategy flag
//! - [`handlers`]: axum routes and the HTTP error boundary
//! - [`server`]: resilient bind (one-shot port fallback) and graceful
//!   shutdown

pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, FetchConfig, ServerConfig, ServiceConfig};
    pub use crate::domain::{mapper, Category, CategoryDto, Item, ItemDto};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{api_router, ApiError, ApiErrorKind, PageQuery};
    pub use crate::repository::{
        CategoryRepository, ItemRepository, MemoryStore, Page, PageRequest,
        PgCategoryRepository, PgItemRepository, RepositoryError, RepositoryErrorKind,
        RepositoryResult,
    };
    pub use crate::server::Server;
    pub use crate::service::{CategoryService, ItemService};
    pub use crate::state::AppState;
}

pub use handlers::api_router;

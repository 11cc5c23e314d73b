//! Data-access layer: pagination primitives, structured errors, async
//! repository traits, and the Postgres / in-memory implementations.

mod error;
mod memory;
mod pagination;
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryStore;
pub use pagination::{Page, PageRequest};
pub use postgres::{PgCategoryRepository, PgItemRepository};
pub use traits::{CategoryRepository, ItemRepository, RepositoryResult};

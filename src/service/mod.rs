//! Application services sitting between the HTTP handlers and the
//! repositories. All reads return DTOs with denormalized category fields
//! populated from the category row current at mapping time.

mod category;
mod item;

pub use category::CategoryService;
pub use item::ItemService;

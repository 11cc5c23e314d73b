//! Catalog domain: entities, wire DTOs, and the mapping between them.

mod dto;
mod entity;
pub mod mapper;

pub use dto::{CategoryDto, ItemDto};
pub use entity::{Category, Item};

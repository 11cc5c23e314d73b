//! Pure entity/DTO mapping. No I/O, no validation; callers resolve the
//! category row before mapping an item in either direction.

use super::{Category, CategoryDto, Item, ItemDto};

pub fn category_to_dto(category: &Category) -> CategoryDto {
    CategoryDto {
        id: category.id,
        code: category.code.clone(),
        name: category.name.clone(),
    }
}

pub fn category_from_dto(dto: &CategoryDto) -> Category {
    Category {
        id: dto.id,
        code: dto.code.clone(),
        name: dto.name.clone(),
    }
}

/// Denormalizes from the category row passed in, which must be the row
/// current at mapping time. Caller-supplied denormalized fields never
/// survive a round trip.
pub fn item_to_dto(item: &Item, category: &Category) -> ItemDto {
    ItemDto {
        id: item.id,
        sku: item.sku.clone(),
        name: item.name.clone(),
        price: item.price,
        stock: item.stock,
        description: item.description.clone(),
        category_id: category.id,
        category_code: Some(category.code.clone()),
        category_name: Some(category.name.clone()),
    }
}

/// Builds an entity from a DTO and its resolved category. The owning
/// category comes from the resolved row, not from whatever the DTO claims.
pub fn item_from_dto(dto: &ItemDto, category_id: i64) -> Item {
    Item {
        id: dto.id,
        sku: dto.sku.clone(),
        name: dto.name.clone(),
        price: dto.price,
        stock: dto.stock,
        description: dto.description.clone(),
        category_id,
    }
}

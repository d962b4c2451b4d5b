pub mod asset;
pub mod household;
pub mod media;
pub mod room;
pub mod scan;
pub mod shopping;
pub mod task;

pub use asset::{Asset, AssetValue};
pub use household::Household;
pub use media::{Document, PhotoRef, RoomPhoto, RoomTocEntry};
pub use room::{Room, RoomHeader};
pub use scan::ItemSuggestion;
pub use shopping::{
    SharedList, SharedListItem, ShoppingItemMeta, ShoppingItemRef, ShoppingList,
    ShoppingListCreated, ShoppingListHeader, ShoppingListItem,
};
pub use task::{Task, TaskPriority, TaskStatus};

pub mod inventory;
pub mod inventory_history;
pub mod product;
pub mod sale;

pub mod prelude {
    pub use super::inventory::Entity as Inventory;
    pub use super::inventory_history::Entity as InventoryHistory;
    pub use super::product::Entity as Product;
    pub use super::sale::Entity as Sale;
}

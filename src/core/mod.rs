pub mod cart;
pub mod catalog;
pub mod shop;

pub use crate::domain::model::{
    AddOutcome, CartEntry, CartLine, Product, ProductSnapshot, ReconcilePolicy, ReconcileReport,
    UpdateOutcome,
};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, KeyValueStore, Presenter};
pub use crate::utils::error::Result;

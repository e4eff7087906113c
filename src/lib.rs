pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use adapters::console::ConsolePresenter;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    http::SearchApiSource,
    storage::{LocalStorage, MemoryStorage},
};
pub use config::toml_config::TomlConfig;
pub use core::{
    cart::Cart,
    catalog::Catalog,
    shop::{Shop, ShopSettings},
};
pub use utils::error::{Result, ShopError};

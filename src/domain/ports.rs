use crate::domain::model::{CartLine, Product, ReconcilePolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Opaque key-value persistence, read once at startup and written after every cart mutation.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Product>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn search_query(&self) -> &str;
    fn result_limit(&self) -> u32;
    fn request_timeout_seconds(&self) -> u64;
    fn storage_path(&self) -> &str;
    fn cart_key(&self) -> &str;
    fn reconcile_policy(&self) -> ReconcilePolicy;
}

/// Hooks the shop calls to show state and to ask the user for decisions.
pub trait Presenter {
    fn render_catalog(&mut self, products: &[Product]);
    fn render_cart_summary(&mut self, total_items: u32);
    fn render_cart_detail(&mut self, lines: &[CartLine], total: f64);
    fn insufficient_stock(&mut self);
    fn empty_cart(&mut self);
    /// Asked before the cart is emptied. Returning false cancels.
    fn confirm_clear(&mut self) -> bool;
    fn cart_cleared(&mut self);
    /// Shown after a purchase. The cart is emptied only once this returns true.
    fn checkout_complete(&mut self, item_count: usize, total: f64) -> bool;
}

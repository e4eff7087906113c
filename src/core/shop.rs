use crate::core::cart::Cart;
use crate::core::catalog::Catalog;
use crate::core::{
    AddOutcome, CatalogSource, KeyValueStore, Presenter, ReconcilePolicy, ReconcileReport, Result,
    UpdateOutcome,
};

/// Settings a shop session needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct ShopSettings {
    pub cart_key: String,
    pub reconcile_policy: ReconcilePolicy,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            cart_key: "cart".to_string(),
            reconcile_policy: ReconcilePolicy::default(),
        }
    }
}

/// One user session: the live catalog, the persisted cart and the presenter
/// that shows them. Every user action re-renders whatever it changed.
pub struct Shop<S: KeyValueStore, P: Presenter> {
    catalog: Catalog,
    cart: Cart<S>,
    presenter: P,
}

impl<S: KeyValueStore, P: Presenter> Shop<S, P> {
    /// Loads the catalog, restores the saved cart and renders the initial view.
    pub async fn start<C: CatalogSource + ?Sized>(
        source: &C,
        store: S,
        presenter: P,
        settings: &ShopSettings,
    ) -> Result<Self> {
        let catalog = Catalog::load(source).await;
        let cart = Cart::open(store, settings.cart_key.clone());
        Self::assemble(catalog, cart, presenter, settings.reconcile_policy)
    }

    pub fn assemble(
        mut catalog: Catalog,
        mut cart: Cart<S>,
        presenter: P,
        policy: ReconcilePolicy,
    ) -> Result<Self> {
        let report = cart.reconcile(&mut catalog, policy)?;
        log_reconcile(&report);

        let mut shop = Self {
            catalog,
            cart,
            presenter,
        };
        shop.render_catalog();
        shop.render_summary();
        Ok(shop)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Puts one unit of the product in the cart.
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<AddOutcome> {
        let outcome = self.cart.add_product(&mut self.catalog, product_id, 1)?;

        if outcome.is_success() {
            self.render_summary();
            self.render_catalog();
        } else {
            tracing::info!("Could not add {} to the cart: {:?}", product_id, outcome);
            self.presenter.insufficient_stock();
        }
        Ok(outcome)
    }

    pub fn change_quantity(&mut self, product_id: &str, quantity: u32) -> Result<UpdateOutcome> {
        let outcome = self
            .cart
            .update_quantity(&mut self.catalog, product_id, quantity)?;

        if outcome.is_success() {
            self.render_summary();
            self.render_catalog();
            self.show_cart();
        } else {
            tracing::info!("Could not set {} to {}: {:?}", product_id, quantity, outcome);
            self.presenter.insufficient_stock();
        }
        Ok(outcome)
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> Result<bool> {
        let removed = self.cart.remove_product(&mut self.catalog, product_id)?;

        self.render_summary();
        self.render_catalog();
        self.show_cart();
        Ok(removed)
    }

    pub fn show_cart(&mut self) {
        let lines = self.cart.list_entries();
        let total = self.cart.compute_total();
        self.presenter.render_cart_detail(&lines, total);
    }

    pub fn show_catalog(&mut self) {
        self.render_catalog();
    }

    /// Empties the cart after the user confirms. Returns whether it was emptied.
    pub fn clear_cart(&mut self) -> Result<bool> {
        if !self.presenter.confirm_clear() {
            tracing::debug!("Cart clear cancelled");
            return Ok(false);
        }

        self.cart.clear(&mut self.catalog)?;
        self.render_summary();
        self.render_catalog();
        self.show_cart();
        self.presenter.cart_cleared();
        Ok(true)
    }

    /// Completes the purchase. Returns whether the cart was emptied.
    pub fn checkout(&mut self) -> Result<bool> {
        if self.cart.is_empty() {
            self.presenter.empty_cart();
            return Ok(false);
        }

        let item_count = self.cart.len();
        let total = self.cart.compute_total();
        tracing::info!("Checkout of {} products for {:.2}", item_count, total);

        if !self.presenter.checkout_complete(item_count, total) {
            return Ok(false);
        }

        // Stock is handed back exactly like a clear; the catalog is refetched next start.
        self.cart.clear(&mut self.catalog)?;
        self.render_summary();
        self.render_catalog();
        Ok(true)
    }

    fn render_catalog(&mut self) {
        self.presenter.render_catalog(self.catalog.products());
    }

    fn render_summary(&mut self) {
        self.presenter.render_cart_summary(self.cart.total_items());
    }
}

fn log_reconcile(report: &ReconcileReport) {
    if report.changed_cart() {
        tracing::info!(
            "Restored cart reconciled: {} units reserved, {} clamped, {} dropped, {} refreshed",
            report.reserved,
            report.clamped.len(),
            report.dropped.len(),
            report.refreshed.len()
        );
    } else if report.reserved > 0 {
        tracing::debug!("Restored cart reserved {} units", report.reserved);
    }
}

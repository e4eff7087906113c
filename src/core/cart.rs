use crate::core::catalog::Catalog;
use crate::core::{
    AddOutcome, CartEntry, CartLine, KeyValueStore, Product, ProductSnapshot, ReconcilePolicy,
    ReconcileReport, Result, UpdateOutcome,
};

/// Persisted product/quantity reservations.
///
/// Entries hold a display snapshot of each product; stock changes always go
/// through the live [`Catalog`] product, looked up by id at the time of the call.
/// Every successful mutation ends by writing the whole entry list to the store.
pub struct Cart<S: KeyValueStore> {
    store: S,
    key: String,
    entries: Vec<CartEntry>,
}

impl<S: KeyValueStore> Cart<S> {
    /// Rehydrates the cart saved under `key`. A missing or unreadable value starts empty.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let entries = match store.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartEntry>>(&raw) {
                Ok(entries) => normalize(entries),
                Err(e) => {
                    tracing::warn!("Ignoring unparseable saved cart '{}': {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read saved cart '{}': {}", key, e);
                Vec::new()
            }
        };

        tracing::debug!("Opened cart '{}' with {} entries", key, entries.len());
        Self {
            store,
            key,
            entries,
        }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.position(product_id).map(|i| self.entries[i].quantity)
    }

    /// Reserves `amount` units of the product from the catalog and records them.
    pub fn add_product(
        &mut self,
        catalog: &mut Catalog,
        product_id: &str,
        amount: u32,
    ) -> Result<AddOutcome> {
        if amount == 0 {
            return Ok(AddOutcome::ZeroAmount);
        }

        let Some(product) = catalog.find_by_id_mut(product_id) else {
            tracing::debug!("Cannot add unknown product {}", product_id);
            return Ok(AddOutcome::UnknownProduct);
        };

        if !product.reserve(amount) {
            tracing::debug!(
                "Not enough stock for {}: requested {}, available {}",
                product_id,
                amount,
                product.stock
            );
            return Ok(AddOutcome::InsufficientStock {
                available: product.stock,
            });
        }

        let quantity = self.record(product, amount);
        tracing::debug!("Added {} x {} (now {})", amount, product_id, quantity);

        self.persist()?;
        Ok(AddOutcome::Added { quantity })
    }

    /// Drops the entry and hands its quantity back to the catalog.
    /// Returns whether an entry existed. The cart is persisted either way.
    pub fn remove_product(&mut self, catalog: &mut Catalog, product_id: &str) -> Result<bool> {
        let removed = match self.position(product_id) {
            Some(index) => {
                let entry = self.entries.remove(index);
                restore(catalog, &entry);
                tracing::debug!("Removed {} x {} from cart", entry.quantity, product_id);
                true
            }
            None => false,
        };

        self.persist()?;
        Ok(removed)
    }

    /// Sets the entry to `new_quantity`, moving the difference out of or back into stock.
    /// Zero removes the entry. A failed update changes nothing and is not persisted.
    pub fn update_quantity(
        &mut self,
        catalog: &mut Catalog,
        product_id: &str,
        new_quantity: u32,
    ) -> Result<UpdateOutcome> {
        let Some(index) = self.position(product_id) else {
            return Ok(UpdateOutcome::NotInCart);
        };

        let current = self.entries[index].quantity;
        let live = catalog.find_by_id_mut(product_id);

        if new_quantity > current {
            let delta = new_quantity - current;
            let available = live.as_ref().map_or(0, |p| p.stock);
            let reserved = match live {
                Some(product) => product.reserve(delta),
                None => false,
            };
            if !reserved {
                tracing::debug!(
                    "Cannot raise {} by {}: only {} in stock",
                    product_id,
                    delta,
                    available
                );
                return Ok(UpdateOutcome::InsufficientStock { available });
            }
        } else if let Some(product) = live {
            product.release(current - new_quantity);
        }

        let outcome = if new_quantity == 0 {
            self.entries.remove(index);
            UpdateOutcome::Removed
        } else {
            self.entries[index].quantity = new_quantity;
            UpdateOutcome::Updated {
                quantity: new_quantity,
            }
        };
        tracing::debug!("Quantity of {} changed {} -> {}", product_id, current, new_quantity);

        self.persist()?;
        Ok(outcome)
    }

    pub fn list_entries(&self) -> Vec<CartLine> {
        self.entries.iter().map(CartLine::from).collect()
    }

    pub fn compute_total(&self) -> f64 {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    pub fn total_items(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Returns every reserved unit to the catalog and empties the cart.
    pub fn clear(&mut self, catalog: &mut Catalog) -> Result<()> {
        for entry in self.entries.drain(..) {
            restore(catalog, &entry);
        }
        tracing::debug!("Cart '{}' cleared", self.key);

        self.persist()
    }

    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.write(&self.key, &json)
    }

    /// Squares entries restored from a previous session with freshly fetched stock.
    pub fn reconcile(
        &mut self,
        catalog: &mut Catalog,
        policy: ReconcilePolicy,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        if policy == ReconcilePolicy::Accept || self.entries.is_empty() {
            return Ok(report);
        }

        let mut kept = Vec::with_capacity(self.entries.len());
        for mut entry in std::mem::take(&mut self.entries) {
            let id = entry.product.id.clone();
            let Some(product) = catalog.find_by_id_mut(&id) else {
                tracing::warn!("Dropping cart entry {}: product no longer in catalog", id);
                report.dropped.push(id);
                continue;
            };

            let reserved = entry.quantity.min(product.stock);
            product.stock -= reserved;
            report.reserved += reserved;

            if reserved == 0 {
                tracing::warn!("Dropping cart entry {}: out of stock", id);
                report.dropped.push(id);
                continue;
            }
            if reserved < entry.quantity {
                tracing::warn!(
                    "Clamping cart entry {} from {} to {} (stock)",
                    id,
                    entry.quantity,
                    reserved
                );
                report.clamped.push(id.clone());
                entry.quantity = reserved;
            }

            let snapshot = ProductSnapshot::from(&*product);
            if snapshot != entry.product {
                report.refreshed.push(id);
                entry.product = snapshot;
            }
            kept.push(entry);
        }
        self.entries = kept;

        if report.changed_cart() {
            self.persist()?;
        }
        Ok(report)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.product.id == product_id)
    }

    fn record(&mut self, product: &Product, amount: u32) -> u32 {
        match self.position(&product.id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_add(amount);
                entry.quantity
            }
            None => {
                self.entries.push(CartEntry {
                    product: ProductSnapshot::from(product),
                    quantity: amount,
                });
                amount
            }
        }
    }
}

fn restore(catalog: &mut Catalog, entry: &CartEntry) {
    match catalog.find_by_id_mut(&entry.product.id) {
        Some(product) => product.release(entry.quantity),
        None => tracing::warn!(
            "Product {} not in catalog; {} units not restored",
            entry.product.id,
            entry.quantity
        ),
    }
}

// Saved carts may be hand-edited: drop empty entries and merge repeated ids.
fn normalize(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|e| e.quantity > 0) {
        match merged.iter_mut().find(|e| e.product.id == entry.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => merged.push(entry),
        }
    }
    merged
}

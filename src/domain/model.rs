use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCT_ID: &str = "no-id";
pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed product";
pub const DEFAULT_PRODUCT_IMAGE: &str = "img/default_product.jpg";
pub const DEFAULT_CONDITION: &str = "unspecified";

/// A catalog product. `stock` is the only field cart operations mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub image: String,
    pub stock: u32,
    pub condition: String,
    pub free_shipping: bool,
}

impl Product {
    /// Takes `amount` units out of stock. Leaves stock untouched and returns
    /// false when there are not enough units.
    pub fn reserve(&mut self, amount: u32) -> bool {
        match self.stock.checked_sub(amount) {
            Some(remaining) => {
                self.stock = remaining;
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, amount: u32) {
        self.stock = self.stock.saturating_add(amount);
    }
}

/// Display copy of a product kept inside a cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub image: String,
    pub condition: String,
    pub free_shipping: bool,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            condition: product.condition.clone(),
            free_shipping: product.free_shipping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartEntry {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.product.unit_price
    }
}

/// Read-only projection of a cart entry for the cart detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub image: String,
    pub condition: String,
    pub free_shipping: bool,
    pub quantity: u32,
    pub subtotal: f64,
}

impl From<&CartEntry> for CartLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.product.id.clone(),
            name: entry.product.name.clone(),
            unit_price: entry.product.unit_price,
            image: entry.product.image.clone(),
            condition: entry.product.condition.clone(),
            free_shipping: entry.product.free_shipping,
            quantity: entry.quantity,
            subtotal: entry.subtotal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added { quantity: u32 },
    InsufficientStock { available: u32 },
    UnknownProduct,
    ZeroAmount,
}

impl AddOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { quantity: u32 },
    Removed,
    InsufficientStock { available: u32 },
    NotInCart,
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. } | UpdateOutcome::Removed)
    }
}

/// How restored cart entries are squared with freshly fetched stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReconcilePolicy {
    /// Deduct restored quantities from fresh stock, clamping to what is available.
    #[default]
    Clamp,
    /// Keep restored entries untouched and trust the fetched stock as-is.
    Accept,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub reserved: u32,
    pub clamped: Vec<String>,
    pub dropped: Vec<String>,
    pub refreshed: Vec<String>,
}

impl ReconcileReport {
    pub fn changed_cart(&self) -> bool {
        !self.clamped.is_empty() || !self.dropped.is_empty() || !self.refreshed.is_empty()
    }
}

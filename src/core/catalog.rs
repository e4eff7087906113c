use crate::core::{CatalogSource, Product};
use std::collections::HashSet;

/// The session's live product list. Rebuilt from the source on every start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, keeping the first product for any repeated id.
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(products.len());

        for product in products {
            if seen.insert(product.id.clone()) {
                unique.push(product);
            } else {
                tracing::warn!("Dropping duplicate catalog product id: {}", product.id);
            }
        }

        Self { products: unique }
    }

    /// Fetches the catalog. Any source failure is logged and yields an empty catalog.
    pub async fn load<C: CatalogSource + ?Sized>(source: &C) -> Self {
        match source.fetch().await {
            Ok(products) => {
                let catalog = Self::new(products);
                tracing::info!("Loaded {} products into the catalog", catalog.len());
                catalog
            }
            Err(e) => {
                tracing::error!("Failed to load products: {}", e);
                Self::default()
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, ShopError};
    use async_trait::async_trait;

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            unit_price: 10.0,
            image: "img/a.jpg".to_string(),
            stock,
            condition: "new".to_string(),
            free_shipping: true,
        }
    }

    struct FixedSource(Vec<Product>);

    #[async_trait]
    impl CatalogSource for FixedSource {
        async fn fetch(&self) -> Result<Vec<Product>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CatalogSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<Product>> {
            Err(ShopError::CatalogFormatError {
                message: "missing results array".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_load_keeps_source_order() {
        let source = FixedSource(vec![product("B", 1), product("A", 2)]);
        let catalog = Catalog::load(&source).await;

        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_load_failure_yields_empty_catalog() {
        let catalog = Catalog::load(&FailingSource).await;
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new(vec![product("A", 1), product("A", 9), product("B", 2)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_id("A").unwrap().stock, 1);
    }

    #[test]
    fn test_find_by_id_absent_is_none() {
        let mut catalog = Catalog::new(vec![product("A", 1)]);
        assert!(catalog.find_by_id("Z").is_none());
        assert!(catalog.find_by_id_mut("Z").is_none());

        catalog.find_by_id_mut("A").unwrap().stock = 7;
        assert_eq!(catalog.find_by_id("A").unwrap().stock, 7);
    }
}

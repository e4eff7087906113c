use crate::core::{CatalogSource, ConfigProvider, Product};
use crate::domain::model::{
    DEFAULT_CONDITION, DEFAULT_PRODUCT_ID, DEFAULT_PRODUCT_IMAGE, DEFAULT_PRODUCT_NAME,
};
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Keyword search endpoint answering `{"results": [...]}`.
pub struct SearchApiSource {
    client: Client,
    endpoint: String,
    query: String,
    limit: u32,
}

impl SearchApiSource {
    pub fn new(endpoint: String, query: String, limit: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            query,
            limit,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.api_endpoint().to_string(),
            config.search_query().to_string(),
            config.result_limit(),
            Duration::from_secs(config.request_timeout_seconds()),
        )
    }
}

#[async_trait]
impl CatalogSource for SearchApiSource {
    async fn fetch(&self) -> Result<Vec<Product>> {
        tracing::debug!(
            "Searching '{}' (limit {}) at: {}",
            self.query,
            self.limit,
            self.endpoint
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", self.query.as_str())])
            .query(&[("limit", self.limit)])
            .send()
            .await?;

        tracing::debug!("Search response status: {}", response.status());
        let json_data: Value = response.error_for_status()?.json().await?;

        let results = json_data
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ShopError::CatalogFormatError {
                message: "response has no 'results' array".to_string(),
            })?;

        let mut products = Vec::with_capacity(results.len());
        for (index, item) in results.iter().enumerate() {
            if item.is_object() {
                products.push(map_search_item(index, item));
            } else {
                tracing::warn!("Skipping non-object search result: {}", item);
            }
        }

        Ok(products)
    }
}

/// Maps one search result to a product, defaulting every missing field.
///
/// `index` is the result's position in the response. It keeps the fallback
/// id unique so id-less results are not merged as duplicates.
pub fn map_search_item(index: usize, item: &Value) -> Product {
    let id = item
        .get("id")
        .and_then(|v| {
            v.as_str()
                .map(str::to_string)
                .or_else(|| v.as_i64().map(|n| n.to_string()))
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{}-{}", DEFAULT_PRODUCT_ID, index));

    let name = non_empty_str(item.get("title")).unwrap_or(DEFAULT_PRODUCT_NAME);

    // The first picture is larger than the thumbnail, so it wins when present.
    let image = non_empty_str(item.pointer("/pictures/0/url"))
        .or_else(|| non_empty_str(item.get("thumbnail")))
        .unwrap_or(DEFAULT_PRODUCT_IMAGE);

    let unit_price = item
        .get("price")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(0.0);

    let stock = item
        .get("available_quantity")
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|q| *q > 0.0).map(|q| q as u64))
        })
        .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let condition = non_empty_str(item.get("condition")).unwrap_or(DEFAULT_CONDITION);

    let free_shipping = item
        .pointer("/shipping/free_shipping")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Product {
        id,
        name: name.to_string(),
        unit_price,
        image: image.to_string(),
        stock,
        condition: condition.to_string(),
        free_shipping,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use httpmock::prelude::*;

    fn source(server: &MockServer) -> SearchApiSource {
        SearchApiSource::new(
            server.url("/sites/MLA/search"),
            "tecnologia".to_string(),
            20,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_maps_search_results() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/sites/MLA/search")
                .query_param("q", "tecnologia")
                .query_param("limit", "20");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "results": [
                        {
                            "id": "MLA1",
                            "title": "Notebook",
                            "price": 1500.5,
                            "thumbnail": "http://img/thumb.jpg",
                            "pictures": [{"url": "http://img/full.jpg"}],
                            "available_quantity": 7,
                            "condition": "new",
                            "shipping": {"free_shipping": true}
                        },
                        {
                            "id": "MLA2",
                            "title": "Mouse",
                            "price": 20,
                            "thumbnail": "http://img/mouse.jpg",
                            "available_quantity": 3,
                            "condition": "used"
                        }
                    ]
                }));
        });

        let products = source(&server).fetch().await.unwrap();

        api_mock.assert();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "MLA1");
        assert_eq!(products[0].image, "http://img/full.jpg");
        assert_eq!(products[0].stock, 7);
        assert!(products[0].free_shipping);
        assert_eq!(products[1].unit_price, 20.0);
        assert_eq!(products[1].image, "http://img/mouse.jpg");
        assert!(!products[1].free_shipping);
    }

    #[test]
    fn test_map_search_item_defaults_missing_fields() {
        let product = map_search_item(3, &serde_json::json!({"price": null, "pictures": []}));

        assert_eq!(product.id, "no-id-3");
        assert_eq!(product.name, DEFAULT_PRODUCT_NAME);
        assert_eq!(product.image, DEFAULT_PRODUCT_IMAGE);
        assert_eq!(product.unit_price, 0.0);
        assert_eq!(product.stock, 0);
        assert_eq!(product.condition, DEFAULT_CONDITION);
        assert!(!product.free_shipping);
    }

    #[test]
    fn test_map_search_item_clamps_negative_numbers() {
        let product = map_search_item(0, &serde_json::json!({
            "id": 42,
            "price": -3.0,
            "available_quantity": -1
        }));

        assert_eq!(product.id, "42");
        assert_eq!(product.unit_price, 0.0);
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_results_without_ids_all_reach_the_catalog() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/sites/MLA/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "results": [
                        {"title": "Cable", "price": 3, "available_quantity": 4},
                        "not a product",
                        {"title": "Adapter", "price": 5, "available_quantity": 1},
                        {"id": "", "title": "Hub"}
                    ]
                }));
        });

        let catalog = Catalog::load(&source(&server)).await;

        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["no-id-0", "no-id-2", "no-id-3"]);
        assert_eq!(catalog.find_by_id("no-id-2").unwrap().name, "Adapter");
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_an_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/sites/MLA/search");
            then.status(500);
        });

        let result = source(&server).fetch().await;

        api_mock.assert();
        assert!(matches!(result, Err(ShopError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_results_is_a_format_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/sites/MLA/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"error": "bad query"}));
        });

        let result = source(&server).fetch().await;

        api_mock.assert();
        assert!(matches!(result, Err(ShopError::CatalogFormatError { .. })));
    }

    #[tokio::test]
    async fn test_catalog_load_soft_fails_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/sites/MLA/search");
            then.status(503);
        });

        let catalog = Catalog::load(&source(&server)).await;
        assert!(catalog.is_empty());
    }
}

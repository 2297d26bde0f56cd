//! Product list state.
//!
//! The store keeps the product list a UI renders from and keeps it in
//! step with the server after each call. Transitions are pure functions
//! over the list; the async methods fetch, then apply.

use basket_core::ProductId;

use crate::http::{ApiClient, ClientError};
use crate::models::{NewProduct, Product};

/// Client-side product list, mirroring catalog responses.
#[derive(Debug)]
pub struct ProductStore {
    client: ApiClient,
    products: Vec<Product>,
}

impl ProductStore {
    /// Create an empty store over an API client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            products: Vec::new(),
        }
    }

    /// The current product list.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Replace the list with every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn fetch_all(&mut self) -> Result<(), ClientError> {
        let fetched = self.client.fetch_products().await?;
        self.products = fetched;
        Ok(())
    }

    /// Replace the list with one category's products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn fetch_by_category(&mut self, category: &str) -> Result<(), ClientError> {
        let fetched = self.client.fetch_by_category(category).await?;
        self.products = fetched;
        Ok(())
    }

    /// Replace the list with the featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn fetch_featured(&mut self) -> Result<(), ClientError> {
        let fetched = self.client.fetch_featured().await?;
        self.products = fetched;
        Ok(())
    }

    /// Create a product and append it to the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn create(&mut self, fields: &NewProduct) -> Result<Product, ClientError> {
        let created = self.client.create_product(fields).await?;
        apply_created(&mut self.products, created.clone());
        Ok(created)
    }

    /// Delete a product and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn delete(&mut self, id: ProductId) -> Result<(), ClientError> {
        self.client.delete_product(id).await?;
        apply_deleted(&mut self.products, id);
        Ok(())
    }

    /// Toggle a product's featured flag and mirror the server's answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left unchanged.
    pub async fn toggle_featured(&mut self, id: ProductId) -> Result<(), ClientError> {
        let updated = self.client.toggle_featured(id).await?;
        apply_toggled(&mut self.products, &updated);
        Ok(())
    }
}

/// Append a freshly created product.
pub fn apply_created(products: &mut Vec<Product>, created: Product) {
    products.push(created);
}

/// Drop a deleted product. Unknown ids are a no-op.
pub fn apply_deleted(products: &mut Vec<Product>, id: ProductId) {
    products.retain(|product| product.id != id);
}

/// Mirror a featured toggle onto the matching entry, touching only the
/// flag. Products not in the current list are ignored; the next fetch
/// picks them up.
pub fn apply_toggled(products: &mut [Product], updated: &Product) {
    if let Some(product) = products.iter_mut().find(|p| p.id == updated.id) {
        product.is_featured = updated.is_featured;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, featured: bool) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: Decimal::new(1999, 2),
            image: String::new(),
            category: "shoes".to_string(),
            is_featured: featured,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_created_appends() {
        let mut products = vec![product(1, false)];
        apply_created(&mut products, product(2, false));

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, ProductId::from(2));
    }

    #[test]
    fn test_apply_deleted_removes_only_target() {
        let mut products = vec![product(1, false), product(2, false), product(3, false)];
        apply_deleted(&mut products, ProductId::from(2));

        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId::from(1), ProductId::from(3)]);
    }

    #[test]
    fn test_apply_deleted_unknown_id_is_noop() {
        let mut products = vec![product(1, false)];
        apply_deleted(&mut products, ProductId::from(99));
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_apply_toggled_flips_only_the_flag() {
        let mut products = vec![product(1, false), product(2, false)];

        let mut updated = product(2, true);
        // The server response may carry other edits; only the flag mirrors
        updated.name = "renamed elsewhere".to_string();
        apply_toggled(&mut products, &updated);

        assert!(products[1].is_featured);
        assert_eq!(products[1].name, "product-2");
        assert!(!products[0].is_featured);
    }

    #[test]
    fn test_apply_toggled_missing_product_is_noop() {
        let mut products = vec![product(1, false)];
        apply_toggled(&mut products, &product(9, true));
        assert!(!products[0].is_featured);
    }
}

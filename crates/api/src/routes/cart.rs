//! Cart handlers.
//!
//! The cart mutates through the pure functions in `basket_core::cart` and
//! persists with a compare-and-swap on `cart_version`. A lost race reloads
//! the user row and replays the same mutation, up to a small bound;
//! exhausting it is treated as a server error rather than silently
//! clobbering a concurrent write.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use basket_core::{CartError, CartItem, ProductId, cart};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{Product, User};
use crate::state::AppState;

/// Retries for a compare-and-swap save that loses to a concurrent write.
const MAX_SAVE_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    /// When omitted, the entire cart is cleared.
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart entry joined with its product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

/// `GET /api/cart` - cart entries joined with their products.
///
/// Entries whose product has been deleted since they were added are
/// silently dropped from the response.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<CartLine>>> {
    let ids: Vec<ProductId> = user.cart_items.iter().map(|item| item.id).collect();
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    Ok(Json(join_lines(&user.cart_items, &products)))
}

/// `POST /api/cart` - add one unit of a product.
///
/// Adding a product already in the cart increments its quantity.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Vec<CartItem>>> {
    let items = mutate_cart(&UserRepository::new(state.pool()), user, |items| {
        cart::add(items, body.product_id);
        Ok(())
    })
    .await?;

    Ok(Json(items))
}

/// `DELETE /api/cart` - remove one entry, or clear the whole cart.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<Vec<CartItem>>> {
    let items = mutate_cart(&UserRepository::new(state.pool()), user, |items| {
        match body.product_id {
            Some(id) => cart::remove(items, id),
            None => cart::clear(items),
        }
        Ok(())
    })
    .await?;

    Ok(Json(items))
}

/// `PUT /api/cart` - overwrite an entry's quantity.
///
/// Quantity zero removes the entry. Targets not in the cart are a 404.
pub async fn set_quantity(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<Vec<CartItem>>> {
    let items = mutate_cart(&UserRepository::new(state.pool()), user, |items| {
        cart::set_quantity(items, body.product_id, body.quantity)
    })
    .await?;

    Ok(Json(items))
}

/// Join cart entries with their products, preserving cart order.
///
/// Entries with no matching product (deleted since the add) are dropped.
fn join_lines(cart_items: &[CartItem], products: &[Product]) -> Vec<CartLine> {
    cart_items
        .iter()
        .filter_map(|item| {
            products
                .iter()
                .find(|product| product.id == item.id)
                .map(|product| CartLine {
                    product: product.clone(),
                    quantity: item.quantity,
                })
        })
        .collect()
}

/// Persistence seam for cart mutations, implemented by the user
/// repository and by test doubles.
pub(crate) trait CartStore {
    /// Versioned save; `false` means the version check lost a race.
    async fn save(
        &self,
        user: &User,
        items: &[CartItem],
    ) -> std::result::Result<bool, RepositoryError>;

    /// Reload the user row after a lost race.
    async fn reload(&self, user: &User) -> std::result::Result<Option<User>, RepositoryError>;
}

impl CartStore for UserRepository<'_> {
    async fn save(
        &self,
        user: &User,
        items: &[CartItem],
    ) -> std::result::Result<bool, RepositoryError> {
        self.save_cart(user.id, items, user.cart_version).await
    }

    async fn reload(&self, user: &User) -> std::result::Result<Option<User>, RepositoryError> {
        self.get_by_id(user.id).await
    }
}

/// Apply a cart mutation and save it with optimistic versioning.
///
/// The mutation runs against a copy of the freshest cart seen; when the
/// versioned save loses a race, the user row is reloaded and the mutation
/// replayed against the winner's cart. Attempts are bounded.
pub(crate) async fn mutate_cart<S, F>(store: &S, mut user: User, mutate: F) -> Result<Vec<CartItem>>
where
    S: CartStore,
    F: Fn(&mut Vec<CartItem>) -> std::result::Result<(), CartError>,
{
    for attempt in 0..MAX_SAVE_ATTEMPTS {
        let mut items = user.cart_items.clone();
        mutate(&mut items).map_err(|CartError::ItemNotFound| {
            AppError::NotFound("Product not found in cart".to_string())
        })?;

        if store.save(&user, &items).await? {
            return Ok(items);
        }

        tracing::debug!(user_id = %user.id, attempt, "cart save lost race, retrying");

        user = store
            .reload(&user)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    }

    Err(AppError::Internal(
        "cart save kept losing to concurrent writes".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use basket_core::{Email, Role, UserId};

    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: Decimal::new(1999, 2),
            image: String::new(),
            category: "shoes".to_string(),
            is_featured: false,
            created_at: Utc::now(),
        }
    }

    fn user(items: Vec<CartItem>, version: i32) -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("cart@example.com").expect("valid email"),
            role: Role::Customer,
            cart_items: items,
            cart_version: version,
            created_at: Utc::now(),
        }
    }

    fn item(id: i32, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_join_drops_entries_for_deleted_products() {
        // Product 2 was deleted after being added to the cart
        let cart_items = vec![item(1, 2), item(2, 1), item(3, 4)];
        let products = vec![product(1), product(3)];

        let lines = join_lines(&cart_items, &products);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product.id, ProductId::new(1));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].product.id, ProductId::new(3));
        assert_eq!(lines[1].quantity, 4);
    }

    #[test]
    fn test_join_preserves_cart_order() {
        let cart_items = vec![item(3, 1), item(1, 1)];
        // Repository results come back ordered by id
        let products = vec![product(1), product(3)];

        let lines = join_lines(&cart_items, &products);

        assert_eq!(lines[0].product.id, ProductId::new(3));
        assert_eq!(lines[1].product.id, ProductId::new(1));
    }

    #[test]
    fn test_join_empty_cart_is_empty() {
        assert!(join_lines(&[], &[product(1)]).is_empty());
    }

    /// In-memory store: rejects saves while `contended_saves` is positive,
    /// serving the concurrent writer's cart on reload.
    struct ContendedStore {
        inner: Mutex<ContendedState>,
    }

    struct ContendedState {
        contended_saves: u32,
        save_calls: u32,
        current: User,
    }

    impl ContendedStore {
        fn new(contended_saves: u32, current: User) -> Self {
            Self {
                inner: Mutex::new(ContendedState {
                    contended_saves,
                    save_calls: 0,
                    current,
                }),
            }
        }

        fn save_calls(&self) -> u32 {
            self.inner.lock().expect("lock").save_calls
        }
    }

    impl CartStore for ContendedStore {
        async fn save(
            &self,
            _user: &User,
            _items: &[CartItem],
        ) -> std::result::Result<bool, RepositoryError> {
            let mut state = self.inner.lock().expect("lock");
            state.save_calls += 1;
            if state.contended_saves > 0 {
                state.contended_saves -= 1;
                return Ok(false);
            }
            Ok(true)
        }

        async fn reload(
            &self,
            _user: &User,
        ) -> std::result::Result<Option<User>, RepositoryError> {
            Ok(Some(self.inner.lock().expect("lock").current.clone()))
        }
    }

    #[tokio::test]
    async fn test_mutation_replays_against_concurrent_winner() {
        // A concurrent add of product 2 wins the first save
        let winner = user(vec![item(2, 1)], 1);
        let store = ContendedStore::new(1, winner);

        let items = mutate_cart(&store, user(vec![], 0), |items| {
            cart::add(items, ProductId::new(1));
            Ok(())
        })
        .await
        .expect("mutation applies after retry");

        // Both writes survive the race
        assert_eq!(items, vec![item(2, 1), item(1, 1)]);
        assert_eq!(store.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_save_attempts_are_bounded() {
        let store = ContendedStore::new(u32::MAX, user(vec![], 0));

        let result = mutate_cart(&store, user(vec![], 0), |items| {
            cart::add(items, ProductId::new(1));
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(store.save_calls(), MAX_SAVE_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_mutation_error_maps_to_not_found() {
        let store = ContendedStore::new(0, user(vec![], 0));

        let result = mutate_cart(&store, user(vec![], 0), |items| {
            cart::set_quantity(items, ProductId::new(9), 5)
        })
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.save_calls(), 0);
    }
}

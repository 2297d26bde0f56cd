//! Cart item type and the cart mutation rules.
//!
//! A cart is an ordered sequence of `{id, quantity}` entries embedded in the
//! user record. The mutation rules live here, I/O-free, so the API crate can
//! apply them inside its optimistic-concurrency save loop and tests can
//! exercise them directly:
//!
//! - adding an existing product increments its quantity by 1
//! - adding a new product appends a normalized `{id, quantity: 1}` entry
//! - setting a quantity of 0 removes the entry
//! - quantities in a stored cart are always >= 1

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Errors from cart mutations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product has no entry in the cart.
    #[error("product not found in cart")]
    ItemNotFound,
}

/// A single cart entry: a product reference and a quantity.
///
/// The product reference is not enforced transactionally; stale entries
/// pointing at deleted products are tolerated and filtered at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Referenced product.
    pub id: ProductId,
    /// Number of units, always >= 1 while stored.
    pub quantity: u32,
}

impl CartItem {
    /// Create a new entry with quantity 1.
    #[must_use]
    pub const fn one(id: ProductId) -> Self {
        Self { id, quantity: 1 }
    }
}

/// Add one unit of a product to the cart.
///
/// Merge-on-add: an existing entry is incremented, otherwise a new
/// `{id, quantity: 1}` entry is appended at the end.
pub fn add(items: &mut Vec<CartItem>, id: ProductId) {
    match items.iter_mut().find(|item| item.id == id) {
        Some(item) => item.quantity += 1,
        None => items.push(CartItem::one(id)),
    }
}

/// Remove the entry for a product, if present.
///
/// Removing a product that is not in the cart is a no-op.
pub fn remove(items: &mut Vec<CartItem>, id: ProductId) {
    items.retain(|item| item.id != id);
}

/// Remove every entry from the cart.
pub fn clear(items: &mut Vec<CartItem>) {
    items.clear();
}

/// Overwrite the quantity of an existing entry.
///
/// A quantity of 0 removes the entry.
///
/// # Errors
///
/// Returns [`CartError::ItemNotFound`] if the product has no entry.
pub fn set_quantity(
    items: &mut Vec<CartItem>,
    id: ProductId,
    quantity: u32,
) -> Result<(), CartError> {
    let item = items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or(CartError::ItemNotFound)?;

    if quantity == 0 {
        remove(items, id);
    } else {
        item.quantity = quantity;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: i32) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_appends_normalized_entry() {
        let mut items = Vec::new();
        add(&mut items, pid(1));
        assert_eq!(items, vec![CartItem { id: pid(1), quantity: 1 }]);
    }

    #[test]
    fn test_add_twice_merges_to_quantity_two() {
        let mut items = Vec::new();
        add(&mut items, pid(1));
        add(&mut items, pid(1));
        assert_eq!(items, vec![CartItem { id: pid(1), quantity: 2 }]);
    }

    #[test]
    fn test_add_preserves_order() {
        let mut items = Vec::new();
        add(&mut items, pid(1));
        add(&mut items, pid(2));
        add(&mut items, pid(1));
        assert_eq!(
            items,
            vec![
                CartItem { id: pid(1), quantity: 2 },
                CartItem { id: pid(2), quantity: 1 },
            ]
        );
    }

    #[test]
    fn test_remove_single_entry() {
        let mut items = vec![CartItem::one(pid(1)), CartItem::one(pid(2))];
        remove(&mut items, pid(1));
        assert_eq!(items, vec![CartItem::one(pid(2))]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut items = vec![CartItem::one(pid(1))];
        remove(&mut items, pid(9));
        assert_eq!(items, vec![CartItem::one(pid(1))]);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut items = vec![CartItem::one(pid(1)), CartItem::one(pid(2))];
        clear(&mut items);
        assert!(items.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites_in_place() {
        let mut items = vec![CartItem::one(pid(1)), CartItem::one(pid(2))];
        set_quantity(&mut items, pid(1), 5).expect("entry exists");
        assert_eq!(
            items,
            vec![
                CartItem { id: pid(1), quantity: 5 },
                CartItem { id: pid(2), quantity: 1 },
            ]
        );
    }

    #[test]
    fn test_set_quantity_zero_removes_entry() {
        let mut items = vec![CartItem::one(pid(1))];
        set_quantity(&mut items, pid(1), 0).expect("entry exists");
        assert!(items.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_product_fails() {
        let mut items = vec![CartItem::one(pid(1))];
        assert_eq!(
            set_quantity(&mut items, pid(9), 3),
            Err(CartError::ItemNotFound)
        );
    }

    #[test]
    fn test_cart_item_json_shape() {
        let item = CartItem { id: pid(3), quantity: 2 };
        let json = serde_json::to_value(item).expect("serialize");
        assert_eq!(json, serde_json::json!({"id": 3, "quantity": 2}));
    }
}

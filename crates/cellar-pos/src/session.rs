//! # Register Session State
//!
//! Holds the open cart for one register terminal.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple UI actions may access/modify the cart
//! 2. Only one action should modify the cart at a time
//! 3. UI actions can run concurrently
//!
//! ## Why Not RwLock?
//! Cart operations are typically quick, and most operations modify state.
//! A RwLock would add complexity with minimal benefit.

use std::sync::{Arc, Mutex};

use cellar_core::Cart;

/// Shared cart state for one register.
#[derive(Debug, Clone)]
pub struct CartSession {
    cart: Arc<Mutex<Cart>>,
}

impl CartSession {
    /// Creates a new empty cart session.
    pub fn new() -> Self {
        CartSession {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = session.with_cart(|cart| pricing::totals(cart, tax_rate));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.with_cart_mut(|cart| cart.add(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Clones the cart out of the lock.
    ///
    /// Checkout is async and the mutex guard cannot be held across an
    /// await point, so finalization works on a snapshot: clone, finalize,
    /// then `clear()` only once the sale has been persisted.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(|cart| cart.clone())
    }

    /// Empties the cart after a completed or abandoned checkout.
    pub fn clear(&self) {
        self.with_cart_mut(|cart| cart.clear());
    }
}

impl Default for CartSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::{Category, Money, Product};
    use chrono::Utc;

    fn test_product(id: &str, price_kwacha: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: Category::Beer,
            price: Money::from_kwacha(price_kwacha),
            cost: Money::from_kwacha(price_kwacha / 2),
            stock,
            barcode: String::new(),
            low_stock_threshold: 5,
            expires_on: None,
            supplier: None,
            image_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_add_and_read() {
        let session = CartSession::new();
        let beer = test_product("p-1", 2_500, 24);

        session.with_cart_mut(|cart| {
            cart.add(&beer);
            cart.add(&beer);
        });

        let units = session.with_cart(|cart| cart.unit_count());
        assert_eq!(units, 2);
    }

    #[test]
    fn test_snapshot_is_independent_of_the_live_cart() {
        let session = CartSession::new();
        let beer = test_product("p-1", 2_500, 24);
        session.with_cart_mut(|cart| cart.add(&beer));

        let frozen = session.snapshot();
        session.clear();

        assert!(session.with_cart(|cart| cart.is_empty()));
        assert_eq!(frozen.unit_count(), 1);
    }

    #[test]
    fn test_clones_share_the_same_cart() {
        let session = CartSession::new();
        let handle = session.clone();

        let beer = test_product("p-1", 2_500, 24);
        session.with_cart_mut(|cart| cart.add(&beer));

        assert_eq!(handle.with_cart(|cart| cart.line_count()), 1);
    }
}

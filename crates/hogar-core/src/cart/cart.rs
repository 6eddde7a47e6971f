//! Cart and cart line types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;

/// The product fields a cart line keeps, captured when it is added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Stock ceiling; `None` means unconstrained.
    pub stock: Option<u32>,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            image: product
                .image
                .clone()
                .or_else(|| product.images.first().cloned()),
            stock: product.stock,
        }
    }
}

/// A cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price at the time the line was created.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    pub stock: Option<u32>,
}

impl CartItem {
    fn new(product: CartProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            original_price: product.original_price,
            image: product.image,
            quantity: 1,
            stock: product.stock,
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }

    fn allows(&self, quantity: u32) -> bool {
        self.stock.map_or(true, |ceiling| quantity <= ceiling)
    }
}

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created at quantity 1.
    Added,
    /// An existing line was incremented to the given quantity.
    Incremented(u32),
    /// The line is already at its stock ceiling; nothing changed.
    AtStockLimit,
    /// The product has no stock; nothing changed.
    OutOfStock,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added | AddOutcome::Incremented(_))
    }

    /// Message shown to the shopper when the add was refused.
    pub fn rejection_message(&self) -> Option<&'static str> {
        match self {
            AddOutcome::AtStockLimit => Some("No hay más stock disponible de este producto"),
            AddOutcome::OutOfStock => Some("Producto agotado"),
            _ => None,
        }
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Added => f.write_str("Producto agregado al carrito"),
            AddOutcome::Incremented(q) => write!(f, "Cantidad actualizada: {}", q),
            other => f.write_str(other.rejection_message().unwrap_or_default()),
        }
    }
}

/// Result of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated,
    Removed,
    /// The requested quantity exceeds the stock ceiling; nothing changed.
    AboveStock,
    NotInCart,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,
    /// Whether the cart drawer is showing.
    #[serde(default)]
    pub is_open: bool,
}

impl Cart {
    /// Create an empty, closed cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    ///
    /// A repeat add increments the existing line unless that would exceed
    /// the line's stock ceiling. The ceiling is the one recorded when the
    /// line was created; later snapshots do not move it. A successful add
    /// opens the cart.
    pub fn add_item(&mut self, product: CartProduct) -> AddOutcome {
        let id = product.id;
        let outcome = match self.items.iter_mut().find(|i| i.id == id) {
            Some(existing) => {
                let next = existing.quantity.saturating_add(1);
                if !existing.allows(next) {
                    AddOutcome::AtStockLimit
                } else {
                    existing.quantity = next;
                    AddOutcome::Incremented(next)
                }
            }
            None if product.stock == Some(0) => AddOutcome::OutOfStock,
            None => {
                self.items.push(CartItem::new(product));
                AddOutcome::Added
            }
        };

        if outcome.is_added() {
            self.is_open = true;
        }
        tracing::debug!(id = %id, ?outcome, "cart add");
        outcome
    }

    /// Remove a line outright, whatever its quantity.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Set a line's quantity. Zero or less removes the line; a quantity
    /// above the stock ceiling is ignored.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> QuantityOutcome {
        if quantity <= 0 {
            return if self.remove_item(id) {
                QuantityOutcome::Removed
            } else {
                QuantityOutcome::NotInCart
            };
        }

        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return QuantityOutcome::NotInCart;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if !item.allows(quantity) {
            return QuantityOutcome::AboveStock;
        }
        item.quantity = quantity;
        QuantityOutcome::Updated
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Total units across all lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Quantity of a product in the cart; zero when absent.
    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |i| i.quantity)
    }

    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: f64, stock: Option<u32>) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: format!("Producto {}", id),
            price: Money::new(price),
            original_price: None,
            image: None,
            stock,
        }
    }

    #[test]
    fn test_add_item_opens_cart() {
        let mut cart = Cart::new();
        assert!(!cart.is_open);
        assert_eq!(cart.add_item(product(1, 1000.0, None)), AddOutcome::Added);
        assert!(cart.is_open);
        assert_eq!(cart.item_quantity(ProductId::new(1)), 1);
    }

    #[test]
    fn test_repeat_add_increments() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000.0, None));
        assert_eq!(cart.add_item(product(1, 1000.0, None)), AddOutcome::Incremented(2));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_stock_ceiling_caps_quantity() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add_item(product(1, 1000.0, Some(3)));
        }
        assert_eq!(cart.item_quantity(ProductId::new(1)), 3);
        assert_eq!(cart.add_item(product(1, 1000.0, Some(3))), AddOutcome::AtStockLimit);
    }

    #[test]
    fn test_line_keeps_first_stock_ceiling() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(product(1, 1000.0, Some(3)));
        }

        assert_eq!(cart.add_item(product(1, 1000.0, Some(1))), AddOutcome::AtStockLimit);
        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.stock, Some(3));
        assert!(line.stock.map_or(true, |ceiling| line.quantity <= ceiling));

        assert_eq!(cart.add_item(product(1, 1000.0, Some(10))), AddOutcome::AtStockLimit);
        assert_eq!(cart.item_quantity(ProductId::new(1)), 3);
    }

    #[test]
    fn test_refused_add_keeps_cart_closed() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(product(1, 1000.0, Some(0))), AddOutcome::OutOfStock);
        assert!(cart.is_empty());
        assert!(!cart.is_open);

        cart.add_item(product(2, 1000.0, Some(1)));
        cart.close();
        assert_eq!(cart.add_item(product(2, 1000.0, Some(1))), AddOutcome::AtStockLimit);
        assert!(!cart.is_open);
    }

    #[test]
    fn test_total_price() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000.0, None));
        cart.add_item(product(1, 1000.0, None));
        cart.add_item(product(2, 500.0, None));
        assert_eq!(cart.total_price(), Money::new(2500.0));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_price_is_snapshotted() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000.0, None));
        cart.add_item(product(1, 1500.0, None));
        assert_eq!(cart.total_price(), Money::new(2000.0));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let id = ProductId::new(1);
        cart.add_item(product(1, 1000.0, Some(4)));

        assert_eq!(cart.update_quantity(id, 4), QuantityOutcome::Updated);
        assert_eq!(cart.item_quantity(id), 4);

        assert_eq!(cart.update_quantity(id, 5), QuantityOutcome::AboveStock);
        assert_eq!(cart.item_quantity(id), 4);

        assert_eq!(cart.update_quantity(id, 0), QuantityOutcome::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.update_quantity(id, -1), QuantityOutcome::NotInCart);
        assert_eq!(cart.update_quantity(id, 2), QuantityOutcome::NotInCart);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1000.0, None));
        cart.add_item(product(1, 1000.0, None));
        cart.add_item(product(2, 500.0, None));

        assert!(cart.remove_item(ProductId::new(1)));
        assert!(!cart.remove_item(ProductId::new(1)));
        assert_eq!(cart.total_items(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_visibility_toggle() {
        let mut cart = Cart::new();
        cart.toggle();
        assert!(cart.is_open);
        cart.toggle();
        assert!(!cart.is_open);
        cart.open();
        cart.close();
        assert!(!cart.is_open);
    }

    #[test]
    fn test_cart_json_shape() {
        let mut cart = Cart::new();
        cart.add_item(product(7, 349990.0, Some(2)));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["isOpen"], true);
        assert_eq!(json["items"][0]["quantity"], 1);
        assert_eq!(json["items"][0]["stock"], 2);
    }
}

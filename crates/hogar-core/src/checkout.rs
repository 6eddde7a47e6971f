//! WhatsApp checkout handoff.
//!
//! Orders are not placed by the store itself: the shopper is sent to a chat
//! with the shop, pre-filled with the order or with a product question.

use crate::cart::{Cart, CouponBook, OrderSummary};
use crate::catalog::Product;
use crate::format::format_price;
use crate::money::Money;

/// The shop's WhatsApp number, international format without `+`.
pub const DEFAULT_WHATSAPP_PHONE: &str = "56985633114";

const WA_BASE_URL: &str = "https://wa.me";

/// Builds pre-filled chat links to one phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsApp {
    phone: String,
}

impl Default for WhatsApp {
    fn default() -> Self {
        Self::new(DEFAULT_WHATSAPP_PHONE)
    }
}

/// Result of handing a cart off to chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    pub summary: OrderSummary,
    pub link: String,
    /// Use count of the applied coupon after redemption.
    pub coupon_uses: Option<u32>,
}

impl WhatsApp {
    /// Digits are kept; anything else (spaces, `+`, dashes) is dropped.
    pub fn new(phone: impl AsRef<str>) -> Self {
        Self {
            phone: phone
                .as_ref()
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Chat link carrying `message`.
    pub fn link(&self, message: &str) -> String {
        format!(
            "{}/{}?text={}",
            WA_BASE_URL,
            self.phone,
            urlencoding::encode(message)
        )
    }

    /// Order message: numbered lines, optional coupon, total.
    pub fn cart_message(summary: &OrderSummary) -> String {
        let mut message = String::from("Hola! Me gustaria realizar el siguiente pedido:\n\n");
        for (index, line) in summary.lines.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", index + 1, line.name));
            message.push_str(&format!("   Cantidad: {}\n", line.quantity));
            message.push_str(&format!("   Precio: {}\n", format_price(line.unit_price)));
            message.push_str(&format!("   Subtotal: {}\n\n", format_price(line.subtotal)));
        }
        if let Some(code) = &summary.coupon_code {
            message.push_str(&format!("Cupon aplicado: {}\n\n", code));
        }
        message.push_str(&format!("TOTAL: {}\n\n", format_price(summary.grand_total)));
        message.push_str("Gracias!");
        message
    }

    pub fn cart_link(&self, summary: &OrderSummary) -> String {
        self.link(&Self::cart_message(summary))
    }

    /// Question about a single product.
    pub fn product_message(name: &str, price: Money) -> String {
        format!(
            "Hola! Me interesa el producto:\n\n{}\nPrecio: {}\n\nPodrian darme mas informacion?",
            name,
            format_price(price)
        )
    }

    pub fn product_inquiry_link(&self, product: &Product) -> String {
        self.link(&Self::product_message(&product.name, product.price))
    }

    /// Price the cart, build its chat link and count one use of the applied
    /// coupon. Returns `None` for an empty cart.
    pub fn checkout(&self, cart: &Cart, coupons: &mut CouponBook) -> Option<Handoff> {
        if cart.is_empty() {
            return None;
        }
        let summary = OrderSummary::compute(cart, coupons);
        let link = self.cart_link(&summary);
        let coupon_uses = coupons.redeem_applied();
        tracing::info!(
            items = summary.total_items,
            total = summary.grand_total.amount(),
            coupon = summary.coupon_code.as_deref().unwrap_or("-"),
            "cart handed off to chat"
        );
        Some(Handoff {
            summary,
            link,
            coupon_uses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;
    use crate::catalog::Catalog;
    use crate::ids::ProductId;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let sofa = CartProduct {
            id: ProductId::new(1),
            name: "Sofa Moderno".into(),
            price: Money::new(899990.0),
            original_price: None,
            image: None,
            stock: Some(3),
        };
        cart.add_item(sofa.clone());
        cart.add_item(sofa);
        cart
    }

    #[test]
    fn test_cart_message() {
        let summary = OrderSummary::compute(&cart(), &CouponBook::default());
        let message = WhatsApp::cart_message(&summary);
        assert_eq!(
            message,
            "Hola! Me gustaria realizar el siguiente pedido:\n\n\
             1. Sofa Moderno\n   Cantidad: 2\n   Precio: $899.990\n   Subtotal: $1.799.980\n\n\
             TOTAL: $1.799.980\n\nGracias!"
        );
    }

    #[test]
    fn test_cart_message_with_coupon() {
        let cart = cart();
        let mut coupons = CouponBook::default();
        coupons.apply("VERANO20", cart.total_price()).unwrap();
        let summary = OrderSummary::compute(&cart, &coupons);
        let message = WhatsApp::cart_message(&summary);
        assert!(message.contains("Cupon aplicado: VERANO20\n\n"));
        assert!(message.contains("TOTAL: $1.439.984\n\n"));
    }

    #[test]
    fn test_link_encodes_message() {
        let wa = WhatsApp::default();
        let link = wa.link("Hola! ¿Precio?\n");
        assert!(link.starts_with("https://wa.me/56985633114?text="));
        assert!(link.contains("%0A"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_phone_is_normalized() {
        assert_eq!(WhatsApp::new("+56 9 8563 3114").phone(), "56985633114");
    }

    #[test]
    fn test_product_inquiry() {
        let catalog = Catalog::seeded();
        let lamp = &catalog.products()[1];
        assert_eq!(
            WhatsApp::product_message(&lamp.name, lamp.price),
            "Hola! Me interesa el producto:\n\nLampara Colgante Dorada\nPrecio: $159.990\n\nPodrian darme mas informacion?"
        );
        let link = WhatsApp::default().product_inquiry_link(lamp);
        assert!(link.contains("Lampara%20Colgante%20Dorada"));
    }

    #[test]
    fn test_checkout_redeems_coupon() {
        let cart = cart();
        let mut coupons = CouponBook::default();
        coupons.apply("VERANO20", cart.total_price()).unwrap();

        let handoff = WhatsApp::default().checkout(&cart, &mut coupons).unwrap();
        assert_eq!(handoff.coupon_uses, Some(1));
        assert_eq!(coupons.find("VERANO20").unwrap().used_count, 1);
        assert!(WhatsApp::default().checkout(&Cart::new(), &mut coupons).is_none());
    }
}

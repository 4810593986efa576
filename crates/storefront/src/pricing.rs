//! Cart totals: subtotal, shipping, promo discount.
//!
//! Totals are derived from the cart lines on demand and never stored.

use std::time::Duration;

use emerald_core::Price;
use serde::Serialize;

use crate::store::CartLine;

/// Orders strictly above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::from_cents(10_000);

/// Flat shipping fee below the threshold.
pub const FLAT_SHIPPING_FEE: Price = Price::from_cents(999);

/// Default promo code.
pub const DEFAULT_PROMO_CODE: &str = "discount20";

/// Default promo percentage.
pub const DEFAULT_PROMO_PERCENT: u32 = 20;

/// Shipping for a given subtotal.
#[must_use]
pub fn shipping_for(subtotal: Price) -> Price {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Sum of `price * quantity` over `lines`.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// A single percentage-off promo code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoPolicy {
    code: String,
    percent_off: u32,
    delay: Duration,
}

impl PromoPolicy {
    /// A promo granting `percent_off`% for `code` (matched case-insensitively).
    #[must_use]
    pub fn new(code: &str, percent_off: u32) -> Self {
        Self {
            code: code.to_lowercase(),
            percent_off: percent_off.min(100),
            delay: Duration::ZERO,
        }
    }

    /// Artificial latency applied by [`apply`](Self::apply).
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The configured code (lower-case).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The configured percentage.
    #[must_use]
    pub const fn percent_off(&self) -> u32 {
        self.percent_off
    }

    /// Whether `entered` is the promo code.
    #[must_use]
    pub fn matches(&self, entered: &str) -> bool {
        entered.to_lowercase() == self.code
    }

    /// Discount for `entered` on `subtotal`: the percentage on a match, zero otherwise.
    #[must_use]
    pub fn discount_for(&self, entered: &str, subtotal: Price) -> Price {
        if self.matches(entered) {
            subtotal.percent(self.percent_off)
        } else {
            Price::ZERO
        }
    }

    /// [`discount_for`](Self::discount_for) after the configured delay.
    pub async fn apply(&self, entered: &str, subtotal: Price) -> Price {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let discount = self.discount_for(entered, subtotal);
        tracing::debug!(
            accepted = !discount.is_zero(),
            discount = discount.cents(),
            "Promo code checked"
        );
        discount
    }
}

impl Default for PromoPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PROMO_CODE, DEFAULT_PROMO_PERCENT)
    }
}

/// Order summary for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub discount: Price,
    pub total: Price,
}

impl CartTotals {
    /// Totals for `lines` with an already computed `discount`.
    ///
    /// The discount is capped at the subtotal so the total never goes below shipping.
    #[must_use]
    pub fn compute(lines: &[CartLine], discount: Price) -> Self {
        let subtotal = subtotal(lines);
        let shipping = shipping_for(subtotal);
        let discount = discount.min(subtotal);
        Self {
            subtotal,
            shipping,
            discount,
            total: (subtotal + shipping).saturating_sub(discount),
        }
    }

    /// Whether shipping is free.
    #[must_use]
    pub const fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emerald_core::{Product, ProductId};

    use super::*;

    fn line(cents: i64, quantity: u32) -> CartLine {
        let mut line = CartLine::new(&Product {
            id: ProductId::new(cents.to_string()),
            name: "Item".to_owned(),
            description: String::new(),
            price: Price::from_cents(cents),
            category: "Test".to_owned(),
            image: String::new(),
        });
        line.quantity = quantity;
        line
    }

    #[test]
    fn test_shipping_threshold() {
        assert_eq!(shipping_for(Price::from_cents(12_000)), Price::ZERO);
        assert_eq!(shipping_for(Price::from_cents(5000)), FLAT_SHIPPING_FEE);
        // Exactly at the threshold still pays shipping.
        assert_eq!(shipping_for(Price::from_cents(10_000)), FLAT_SHIPPING_FEE);
        assert_eq!(shipping_for(Price::from_cents(10_001)), Price::ZERO);
    }

    #[test]
    fn test_promo_discount() {
        let promo = PromoPolicy::default();
        let subtotal = Price::from_cents(10_000);

        assert_eq!(promo.discount_for("discount20", subtotal), Price::from_cents(2000));
        assert_eq!(promo.discount_for("DISCOUNT20", subtotal), Price::from_cents(2000));
        assert_eq!(promo.discount_for("discount10", subtotal), Price::ZERO);
        assert_eq!(promo.discount_for("", subtotal), Price::ZERO);
        assert_eq!(promo.discount_for(" discount20", subtotal), Price::ZERO);
    }

    #[test]
    fn test_custom_promo_policy() {
        let promo = PromoPolicy::new("Spring", 15);
        assert_eq!(promo.code(), "spring");
        assert_eq!(
            promo.discount_for("SPRING", Price::from_cents(2000)),
            Price::from_cents(300)
        );
        assert_eq!(PromoPolicy::new("x", 250).percent_off(), 100);
    }

    #[test]
    fn test_totals_with_free_shipping_and_discount() {
        let lines = [line(4999, 2), line(2001, 1)];
        let promo = PromoPolicy::default();
        let discount = promo.discount_for("discount20", subtotal(&lines));

        let totals = CartTotals::compute(&lines, discount);

        assert_eq!(totals.subtotal, Price::from_cents(11_999));
        assert!(totals.free_shipping());
        assert_eq!(totals.discount, Price::from_cents(2400));
        assert_eq!(totals.total, Price::from_cents(9599));
    }

    #[test]
    fn test_totals_with_flat_shipping() {
        let totals = CartTotals::compute(&[line(5000, 1)], Price::ZERO);
        assert_eq!(totals.shipping, FLAT_SHIPPING_FEE);
        assert_eq!(totals.total, Price::from_cents(5999));
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals = CartTotals::compute(&[], Price::from_cents(500));
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.discount, Price::ZERO);
        assert_eq!(totals.total, FLAT_SHIPPING_FEE);
    }

    #[tokio::test]
    async fn test_apply_waits_for_configured_delay() {
        let promo = PromoPolicy::default().with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();

        let discount = promo.apply("discount20", Price::from_cents(5000)).await;

        assert_eq!(discount, Price::from_cents(1000));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}

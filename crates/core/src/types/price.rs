//! Prices in integer minor currency units.
//!
//! All storefront amounts are whole cents. Arithmetic never goes through
//! floating point; percentage math uses `rust_decimal` and rounds half away
//! from zero, so `20%` of `$0.05` is one cent.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in cents (USD).
///
/// Serialized as a bare integer, matching how persisted collections store it.
///
/// ```rust
/// # use emerald_core::Price;
/// let lamp = Price::from_cents(4999);
/// assert_eq!(lamp.to_string(), "$49.99");
/// assert_eq!(lamp.times(2), Price::from_cents(9998));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create a price from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// The amount in dollars as an exact decimal (e.g. `49.99`).
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Multiply by a line quantity, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// `percent`% of this price, rounded to the nearest cent (half away from zero).
    #[must_use]
    pub fn percent(self, percent: u32) -> Self {
        let scaled = Decimal::from(self.0) * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(i64::try_from(rounded).unwrap_or(i64::MAX))
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let value = self.0.saturating_sub(other.0);
        if value < 0 { Self::ZERO } else { Self(value) }
    }

    /// Whether this is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-${:.2}", Decimal::new(self.0.saturating_abs(), 2))
        } else {
            write!(f, "${:.2}", self.as_decimal())
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Price {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

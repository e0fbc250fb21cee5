//! Cart value objects

use serde::Serialize;

use crate::error::{CartError, CartResult};

pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 10_000;

const QUANTITY_RANGE_MESSAGE: &str = "Quantity must be an integer between 1 and 10000";
const PRICE_MESSAGE: &str = "Price must be a non-negative number";

/// Number of units of one product in a cart, `1..=10000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i64) -> CartResult<Self> {
        if !(i64::from(MIN_QUANTITY)..=i64::from(MAX_QUANTITY)).contains(&value) {
            return Err(CartError::validation(QUANTITY_RANGE_MESSAGE));
        }
        Ok(Self(value as i32))
    }

    /// JSON numbers arrive as `f64`; `2.0` is accepted, `2.5` is not
    pub fn from_json(value: f64) -> CartResult<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(CartError::validation(QUANTITY_RANGE_MESSAGE));
        }
        Self::new(value as i64)
    }

    pub fn one() -> Self {
        Self(MIN_QUANTITY)
    }

    /// Combined quantity when the same product is added again
    pub fn checked_add(self, other: Quantity) -> CartResult<Self> {
        Self::new(i64::from(self.0) + i64::from(other.0))
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Trusted value from the database (guarded by a CHECK constraint)
    pub fn from_db(value: i32) -> Self {
        Self(value)
    }
}

/// Unit price, finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> CartResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CartError::validation(PRICE_MESSAGE));
        }
        // Normalize -0.0
        Ok(Self(value + 0.0))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn from_db(value: f64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-3).is_err());
        assert!(Quantity::new(10_001).is_err());
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(10_000).unwrap().get(), 10_000);
    }

    #[test]
    fn test_quantity_from_json() {
        assert_eq!(Quantity::from_json(3.0).unwrap().get(), 3);
        assert!(Quantity::from_json(2.5).is_err());
        assert!(Quantity::from_json(f64::NAN).is_err());
        assert!(Quantity::from_json(1e12).is_err());
    }

    #[test]
    fn test_quantity_checked_add() {
        let a = Quantity::new(9_999).unwrap();
        assert_eq!(a.checked_add(Quantity::one()).unwrap().get(), 10_000);
        assert!(a.checked_add(Quantity::new(2).unwrap()).is_err());
    }

    #[test]
    fn test_price() {
        assert_eq!(Price::new(0.0).unwrap().get(), 0.0);
        assert_eq!(Price::new(19.99).unwrap().get(), 19.99);
        assert!(Price::new(-0.01).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(-0.0).unwrap().get().is_sign_positive());
    }
}

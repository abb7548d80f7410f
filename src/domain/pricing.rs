use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Unit price for the current batch, in minor currency units per kilogram.
///
/// Zero means "unset"; a batch cannot be sold until a price is in place.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    price_per_unit: u64,
}

impl Pricing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the unit price. The prior value is kept on failure.
    pub fn set_price_per_unit(&mut self, price: u64) -> Result<()> {
        if price == 0 {
            return Err(LedgerError::InvalidPrice);
        }
        self.price_per_unit = price;
        Ok(())
    }

    pub fn price_per_unit(&self) -> u64 {
        self.price_per_unit
    }

    /// Price of the whole batch at the current unit price.
    pub fn total_price(&self, aggregate_quantity: u64) -> Result<u64> {
        aggregate_quantity
            .checked_mul(self.price_per_unit)
            .ok_or(LedgerError::ArithmeticOverflow("batch price"))
    }
}

//! # Invoice Totals Calculator
//!
//! Derives `subtotal`, `tax_amount`, and `total` from an invoice's line
//! items and tax rate.
//!
//! ## Contract
//! ```text
//! subtotal = Σ round(quantity_i × unit_price_i)
//! tax      = subtotal × tax_rate          (half-up, see Money::apply_rate)
//! total    = subtotal + tax
//! ```
//!
//! Totals are recomputed in full whenever the item list changes; there is
//! no incremental update. The function is pure and idempotent: identical
//! input always yields identical output. The persistence layer writes the
//! result back onto the owning invoice's stored columns.

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{validate_amount_cents, validate_quantity, validate_tax_rate_bps};

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// One line-item input: what the caller supplies before totals exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInput {
    /// May be fractional (2.5 hours of consulting).
    pub quantity: f64,
    pub unit_price: Money,
}

impl LineInput {
    pub const fn new(quantity: f64, unit_price: Money) -> Self {
        LineInput {
            quantity,
            unit_price,
        }
    }

    /// Line total: quantity × unit price, rounded to cents once.
    pub fn total(&self) -> Money {
        self.unit_price.times_hours(self.quantity)
    }
}

/// The derived totals for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

// =============================================================================
// Computation
// =============================================================================

/// Computes subtotal, tax, and grand total for a list of line items.
///
/// Rejects negative quantities, negative unit prices, and out-of-range
/// tax rates before computing anything. An empty item list is valid and
/// yields all-zero totals.
///
/// ## Example
/// ```rust
/// use tally_core::invoice::{compute_invoice_totals, LineInput};
/// use tally_core::money::Money;
/// use tally_core::types::TaxRate;
///
/// let items = [
///     LineInput::new(3.0, Money::from_cents(1000)), // 3 × $10.00
///     LineInput::new(1.0, Money::from_cents(2550)), // 1 × $25.50
/// ];
/// let totals = compute_invoice_totals(&items, TaxRate::from_bps(1000)).unwrap();
///
/// assert_eq!(totals.subtotal.cents(), 5550);   // $55.50
/// assert_eq!(totals.tax_amount.cents(), 555);  // 10% = $5.55
/// assert_eq!(totals.total.cents(), 6105);      // $61.05
/// ```
pub fn compute_invoice_totals(items: &[LineInput], tax_rate: TaxRate) -> CoreResult<InvoiceTotals> {
    validate_tax_rate_bps(tax_rate.bps())?;

    for item in items {
        validate_quantity(item.quantity)?;
        validate_amount_cents("unit_price", item.unit_price.cents())?;
    }

    let subtotal: Money = items.iter().map(LineInput::total).sum();
    let tax_amount = subtotal.apply_rate(tax_rate);
    let total = subtotal + tax_amount;

    Ok(InvoiceTotals {
        subtotal,
        tax_amount,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LineInput> {
        vec![
            LineInput::new(3.0, Money::from_cents(1000)),
            LineInput::new(2.5, Money::from_cents(800)),
        ]
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let totals = compute_invoice_totals(&items(), TaxRate::zero()).unwrap();
        // 3×$10.00 + 2.5×$8.00 = $30.00 + $20.00 = $50.00
        assert_eq!(totals.subtotal.cents(), 5000);
        assert_eq!(totals.tax_amount.cents(), 0);
        assert_eq!(totals.total.cents(), 5000);
    }

    #[test]
    fn test_tax_and_total() {
        let totals = compute_invoice_totals(&items(), TaxRate::from_bps(825)).unwrap();
        // $50.00 × 8.25% = $4.125 → $4.13
        assert_eq!(totals.tax_amount.cents(), 413);
        assert_eq!(totals.total.cents(), 5413);
        assert_eq!(
            totals.total,
            totals.subtotal + totals.tax_amount,
            "total must equal subtotal plus tax"
        );
    }

    #[test]
    fn test_empty_item_list_yields_zero() {
        let totals = compute_invoice_totals(&[], TaxRate::from_bps(1000)).unwrap();
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax_amount.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_idempotent() {
        let a = compute_invoice_totals(&items(), TaxRate::from_bps(825)).unwrap();
        let b = compute_invoice_totals(&items(), TaxRate::from_bps(825)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_quantity_line_is_valid() {
        let items = [LineInput::new(0.0, Money::from_cents(9999))];
        let totals = compute_invoice_totals(&items, TaxRate::zero()).unwrap();
        assert!(totals.subtotal.is_zero());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let items = [LineInput::new(-1.0, Money::from_cents(100))];
        assert!(compute_invoice_totals(&items, TaxRate::zero()).is_err());
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let items = [LineInput::new(1.0, Money::from_cents(-100))];
        assert!(compute_invoice_totals(&items, TaxRate::zero()).is_err());
    }

    #[test]
    fn test_out_of_range_tax_rate_rejected() {
        assert!(compute_invoice_totals(&[], TaxRate::from_bps(10001)).is_err());
    }
}

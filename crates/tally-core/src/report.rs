//! # Reporting Aggregation
//!
//! The pure math and summary shapes behind the reporting queries. The
//! db layer runs owner-scoped SQL sums and feeds the results through
//! these helpers; nothing here touches a database.
//!
//! ## Division Guards
//! Every ratio in this module is guarded: growth over a zero previous
//! month, margin over zero revenue, and payment rate over zero invoices
//! all yield `0.0` rather than dividing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Summary Shapes
// =============================================================================

/// Owner-wide financial summary over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Sum of paid invoice totals issued in the range.
    pub total_revenue: Money,
    /// Sum of sent and overdue invoice totals issued in the range.
    pub outstanding_amount: Money,
    pub outstanding_count: i64,
    pub total_expenses: Money,
    pub total_payroll: Money,
    pub net_profit: Money,
    /// Net profit as a percentage of revenue; 0 when revenue is 0.
    pub profit_margin: f64,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
}

/// One calendar-month bucket of the summary series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Money,
    pub expenses: Money,
    pub profit: Money,
}

/// Current-vs-previous calendar month comparison for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub month_revenue: Money,
    pub month_expenses: Money,
    pub month_profit: Money,
    pub revenue_growth: f64,
    pub expense_growth: f64,
    pub outstanding_amount: Money,
    pub outstanding_count: i64,
}

/// Counts and rates for the dashboard's stat tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickStats {
    pub total_invoices: i64,
    pub draft_invoices: i64,
    pub sent_invoices: i64,
    pub paid_invoices: i64,
    pub overdue_invoices: i64,
    /// paid / total × 100; 0 when there are no invoices.
    pub payment_rate: f64,
    pub pending_expenses: i64,
    pub active_employees: i64,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: i64,
}

/// Payroll totals for one employee over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayrollTotal {
    pub employee_id: String,
    pub employee_name: String,
    pub gross: Money,
    pub net: Money,
    pub record_count: i64,
}

// =============================================================================
// Ratio Helpers
// =============================================================================

/// Month-over-month growth as a percentage.
///
/// `(current − previous) / previous × 100`, or `0.0` when the previous
/// value is zero (a new business's first month is "no growth", not
/// infinite growth).
pub fn growth_percent(current: Money, previous: Money) -> f64 {
    if previous.is_zero() {
        return 0.0;
    }

    (current.cents() - previous.cents()) as f64 / previous.cents() as f64 * 100.0
}

/// Net profit as a percentage of revenue; `0.0` when revenue is zero.
pub fn profit_margin(net_profit: Money, revenue: Money) -> f64 {
    if revenue.is_zero() {
        return 0.0;
    }

    net_profit.cents() as f64 / revenue.cents() as f64 * 100.0
}

/// Share of invoices that are paid, as a percentage; `0.0` when there
/// are no invoices.
pub fn payment_rate(paid: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    paid as f64 / total as f64 * 100.0
}

// =============================================================================
// Month Bucketing
// =============================================================================

/// The calendar months touched by an inclusive date range, oldest
/// first, as `(first-of-month, "YYYY-MM")` pairs.
///
/// A range within one month yields a single bucket. An inverted range
/// yields no buckets.
pub fn month_buckets(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, String)> {
    let mut buckets = Vec::new();
    let mut cursor = match start.with_day(1) {
        Some(d) => d,
        None => return buckets,
    };

    while cursor <= end {
        buckets.push((cursor, format!("{:04}-{:02}", cursor.year(), cursor.month())));
        cursor = next_month(cursor);
    }

    buckets
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    // Day 1 of a valid month always exists.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// First day of the month before the one containing `date`.
pub fn prev_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_growth_percent() {
        assert_eq!(
            growth_percent(Money::from_cents(15000), Money::from_cents(10000)),
            50.0
        );
        assert_eq!(
            growth_percent(Money::from_cents(5000), Money::from_cents(10000)),
            -50.0
        );
    }

    #[test]
    fn test_growth_guards_zero_previous() {
        assert_eq!(growth_percent(Money::from_cents(15000), Money::zero()), 0.0);
        assert_eq!(growth_percent(Money::zero(), Money::zero()), 0.0);
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(
            profit_margin(Money::from_cents(2500), Money::from_cents(10000)),
            25.0
        );
        assert_eq!(profit_margin(Money::from_cents(2500), Money::zero()), 0.0);
    }

    #[test]
    fn test_payment_rate() {
        assert_eq!(payment_rate(3, 4), 75.0);
        assert_eq!(payment_rate(0, 0), 0.0);
    }

    #[test]
    fn test_month_buckets_spans_calendar_months() {
        let buckets = month_buckets(d(2025, 11, 15), d(2026, 2, 3));
        let labels: Vec<&str> = buckets.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(labels, ["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert_eq!(buckets[0].0, d(2025, 11, 1));
        assert_eq!(buckets[3].0, d(2026, 2, 1));
    }

    #[test]
    fn test_month_buckets_single_month() {
        let buckets = month_buckets(d(2026, 3, 5), d(2026, 3, 20));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].1, "2026-03");
    }

    #[test]
    fn test_month_buckets_inverted_range_is_empty() {
        assert!(month_buckets(d(2026, 4, 1), d(2026, 3, 1)).is_empty());
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(next_month(d(2025, 12, 31)), d(2026, 1, 1));
        assert_eq!(next_month(d(2026, 5, 10)), d(2026, 6, 1));
        assert_eq!(prev_month(d(2026, 1, 15)), d(2025, 12, 1));
        assert_eq!(month_start(d(2026, 7, 19)), d(2026, 7, 1));
    }
}

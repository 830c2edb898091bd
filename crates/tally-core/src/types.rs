//! # Domain Types
//!
//! Core ledger entities used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Entities                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │──►│  InvoiceItem    │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  quantity       │   │  invoice_id(FK) │       │
//! │  │  invoice_number │   │  unit_price     │   │  amount_cents   │       │
//! │  │  status         │   │  total_cents    │   │  method         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Employee     │──►│  PayrollRecord  │   │   TimeEntry     │       │
//! │  │  salary /       │   │  gross, 4 stat. │   │  hours_worked   │       │
//! │  │  hourly_rate    │   │  deductions,net │   │  is_overtime    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Expense ──(soft name reference)──► ExpenseCategory                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where humans need one: `invoice_number`, `employee_id`
//!
//! All entities carry an `owner_id`: records never cross owners, and
//! every query is scoped by it explicitly.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%. Integer bps keep rate math exact; the statutory
/// payroll rates (6.2%, 1.45%) are representable without floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Status Enums
// =============================================================================

/// Lifecycle of an invoice.
///
/// Legal transitions: draft → sent → paid, and sent → overdue by
/// due-date comparison. Overdue invoices can still become paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted, totals may still change.
    #[default]
    Draft,
    /// Invoice has been issued to the client.
    Sent,
    /// Cumulative payments reached the total.
    Paid,
    /// Sent but past its due date.
    Overdue,
}

impl InvoiceStatus {
    /// Stable string form, matching the stored column value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

/// How a payment or expense was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Check,
    CreditCard,
    BankTransfer,
}

/// Approval state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Employment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

/// Processing state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    #[default]
    Pending,
    Processed,
    Paid,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice issued to a client.
///
/// The stored `subtotal_cents`/`tax_cents`/`total_cents` are derived
/// fields, recomputed in full whenever the item list changes. Invariant:
/// `total = subtotal + tax`, `tax = subtotal × tax_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub owner_id: String,
    /// Business identifier, e.g. `INV-20260215-3F9A21BC`.
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal_cents: i64,
    /// Tax rate in basis points (825 = 8.25%).
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Whether the invoice counts as outstanding (issued, unpaid).
    #[inline]
    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on an invoice.
///
/// Owned exclusively by one invoice and deleted with it.
/// Invariant: `total_cents = round(quantity × unit_price_cents)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    /// Quantity may be fractional (2.5 hours of consulting).
    pub quantity: f64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
}

impl InvoiceItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received against an invoice.
///
/// An invoice can have multiple partial payments; once their sum reaches
/// the invoice total the invoice flips to `paid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub amount_cents: i64,
    pub payment_date: NaiveDate,
    pub method: Option<PaymentMethod>,
    /// External reference (check number, transfer id).
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A business expense.
///
/// `category` is a soft reference to an [`ExpenseCategory`] name; it is
/// not enforced by the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub owner_id: String,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
    pub expense_date: NaiveDate,
    pub vendor: Option<String>,
    pub receipt_url: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: ExpenseStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A named expense category for grouping and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Hex color code for charts, e.g. `#4f9da6`.
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Employee
// =============================================================================

/// An employee on the payroll.
///
/// Exactly one pay model applies, selected by the presence of
/// `hourly_rate_cents`: hourly employees are paid by the hour, salaried
/// employees get `salary / 26` per biweekly period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: String,
    pub owner_id: String,
    /// Business identifier, e.g. `EMP-3F9A21BC`.
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub hire_date: NaiveDate,
    pub position: Option<String>,
    pub department: Option<String>,
    /// Annual salary in cents.
    pub salary_cents: i64,
    /// Hourly rate in cents; presence selects the hourly pay model.
    pub hourly_rate_cents: Option<i64>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    #[inline]
    pub fn salary(&self) -> Money {
        Money::from_cents(self.salary_cents)
    }

    #[inline]
    pub fn hourly_rate(&self) -> Option<Money> {
        self.hourly_rate_cents.map(Money::from_cents)
    }

    /// Whether this employee is paid by the hour.
    #[inline]
    pub fn is_hourly(&self) -> bool {
        self.hourly_rate_cents.is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Payroll Record
// =============================================================================

/// A single pay-period result for one employee.
///
/// Invariants: `gross = regular_pay + overtime_pay` (per-record path),
/// `net = gross − Σ deductions`; at most one record exists per
/// (employee, pay_period_start, pay_period_end) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PayrollRecord {
    pub id: String,
    pub employee_id: String,
    pub pay_period_start: NaiveDate,
    pub pay_period_end: NaiveDate,
    pub pay_date: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_pay_cents: i64,
    pub overtime_pay_cents: i64,
    pub gross_cents: i64,
    pub federal_tax_cents: i64,
    pub state_tax_cents: i64,
    pub social_security_cents: i64,
    pub medicare_cents: i64,
    pub other_deductions_cents: i64,
    pub net_cents: i64,
    pub status: PayrollStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PayrollRecord {
    #[inline]
    pub fn gross(&self) -> Money {
        Money::from_cents(self.gross_cents)
    }

    #[inline]
    pub fn net(&self) -> Money {
        Money::from_cents(self.net_cents)
    }

    /// Sum of all deduction fields.
    pub fn total_deductions(&self) -> Money {
        Money::from_cents(
            self.federal_tax_cents
                + self.state_tax_cents
                + self.social_security_cents
                + self.medicare_cents
                + self.other_deductions_cents,
        )
    }
}

// =============================================================================
// Time Entry
// =============================================================================

/// A single clock-in/clock-out record for one calendar day.
///
/// `hours_worked` is derived from the times; `is_overtime` is true when
/// this single entry exceeds 8 hours (strictly).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TimeEntry {
    pub id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hours_worked: f64,
    pub is_overtime: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
        assert_eq!(ExpenseStatus::default(), ExpenseStatus::Pending);
        assert_eq!(EmployeeStatus::default(), EmployeeStatus::Active);
        assert_eq!(PayrollStatus::default(), PayrollStatus::Pending);
    }

    #[test]
    fn test_invoice_status_as_str() {
        assert_eq!(InvoiceStatus::Sent.as_str(), "sent");
        assert_eq!(InvoiceStatus::Overdue.as_str(), "overdue");
    }
}

//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally, a small-business accounting
//! system. It contains all derived-value computation as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (external, out of scope)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │        Repositories, transactions, embedded migrations          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  payroll  │  │  report   │  │   │
//! │  │   │  Invoice  │  │   Money   │  │  gross/   │  │  growth,  │  │   │
//! │  │   │  Employee │  │  TaxRate  │  │  net pay  │  │  buckets  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, Expense, Employee, PayrollRecord, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice subtotal/tax/total computation
//! - [`payroll`] - Gross/net pay and statutory withholding
//! - [`timesheet`] - Worked-hours and overtime computation
//! - [`report`] - Date-bucketed aggregation math and summary types
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float drift
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Explicit Owners**: Owner scoping is a parameter, never ambient state

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod payroll;
pub mod report;
pub mod timesheet;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{compute_invoice_totals, InvoiceTotals, LineInput};
pub use money::Money;
pub use payroll::{compute_batch_pay, compute_payroll, PayrollBreakdown};
pub use timesheet::{compute_time_entry_hours, TimeEntryHours};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of biweekly pay periods in a year.
///
/// Salaried employees are paid `annual_salary / 26` per period.
pub const PAY_PERIODS_PER_YEAR: i64 = 26;

/// Length of the trailing pay-period window used by the batch payroll run.
pub const PAY_PERIOD_DAYS: i64 = 14;

/// Regular-hours cap per biweekly pay period.
///
/// Hours beyond the cap in a batch run are treated as overtime.
pub const REGULAR_HOURS_CAP: f64 = 80.0;

/// A single time entry longer than this many hours is flagged overtime.
/// The boundary is exclusive: exactly 8.0 hours is NOT overtime.
pub const DAILY_OVERTIME_THRESHOLD: f64 = 8.0;

/// Overtime pay multiplier (time and a half).
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

//! # tally-db: Database Layer for Tally
//!
//! This crate provides database access for the Tally accounting system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  Request layer (create_invoice, run_payroll, ...)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (invoice.rs,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  payroll.rs,  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  report.rs..) │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                    calls tally-core calculators                │   │
//! │  │            (totals, payroll, hours: all derived values         │   │
//! │  │             are computed in core, then persisted here)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys ON)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (invoice, expense, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/tally.db");
//! let db = Database::new(config).await?;
//!
//! let invoice = db.invoices().create(owner_id, new_invoice).await?;
//! let outcome = db.payroll().run_batch(owner_id, start, end, pay_date).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::employee::{EmployeeRepository, EmployeeUpdate, NewEmployee};
pub use repository::expense::{ExpenseRepository, ExpenseUpdate, NewExpense};
pub use repository::invoice::{
    InvoiceRepository, InvoiceUpdate, NewInvoice, NewInvoiceItem, NewPayment,
};
pub use repository::payroll::{PayrollBatchOutcome, PayrollRepository};
pub use repository::report::ReportRepository;
pub use repository::time_entry::{NewTimeEntry, TimeEntryRepository};

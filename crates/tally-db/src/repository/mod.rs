//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request handler                                                       │
//! │       │                                                                 │
//! │       │  db.invoices().list(owner_id, None, 50, 0)                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── create(&self, owner_id, new_invoice)                              │
//! │  ├── get(&self, owner_id, id)                                          │
//! │  ├── add_payment(&self, invoice_id, payment)                           │
//! │  └── mark_overdue(&self, owner_id, as_of)                              │
//! │       │                                                                 │
//! │       │  SQL Query (derived values computed in tally-core first)       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Conventions:                                                           │
//! │  • Owner scoping is an explicit parameter, never ambient state         │
//! │  • Every multi-row write runs in one transaction                       │
//! │  • Derived values (totals, pay, hours) come from tally-core            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`invoice::InvoiceRepository`] - Invoices, items, payments
//! - [`expense::ExpenseRepository`] - Expenses and categories
//! - [`employee::EmployeeRepository`] - Employee records
//! - [`time_entry::TimeEntryRepository`] - Clock-in/clock-out entries
//! - [`payroll::PayrollRepository`] - Payroll records and the batch run
//! - [`report::ReportRepository`] - Owner-scoped aggregation queries

pub mod employee;
pub mod expense;
pub mod invoice;
pub mod payroll;
pub mod report;
pub mod time_entry;

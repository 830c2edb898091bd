//! # Payroll Calculator
//!
//! Derives gross and net pay for a pay period.
//!
//! ## Two Withholding Paths (BOTH intentional)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PATH A: per-record creation (compute_payroll)                          │
//! │    four flat statutory rates applied to gross:                          │
//! │    federal 15% · state 5% · social security 6.2% · medicare 1.45%       │
//! │                                                                         │
//! │  PATH B: batch run (compute_batch_pay)                                  │
//! │    one flat 15% of gross, then split across the four fields:            │
//! │    federal 60% · state 20% · social security 15% · medicare 5%          │
//! │                                                                         │
//! │  The two paths produce DIFFERENT withholding for the same gross.        │
//! │  This is a known inconsistency carried over from the system this        │
//! │  replaces; product owners have been flagged. Do not unify without       │
//! │  sign-off.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All rates are flat approximations, configuration constants rather
//! than tax-bracket logic.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Employee, TaxRate};
use crate::validation::{validate_amount_cents, validate_hours};
use crate::{OVERTIME_MULTIPLIER, PAY_PERIODS_PER_YEAR, REGULAR_HOURS_CAP};

// =============================================================================
// Statutory Rates (Path A)
// =============================================================================

/// The flat statutory withholding rates applied by per-record payroll
/// creation. Counterpart: [`BlendedSplit`] used by the batch run.
#[derive(Debug, Clone, Copy)]
pub struct StatutoryRates {
    pub federal: TaxRate,
    pub state: TaxRate,
    pub social_security: TaxRate,
    pub medicare: TaxRate,
}

impl StatutoryRates {
    /// federal 15% · state 5% · social security 6.2% · medicare 1.45%
    pub const DEFAULT: StatutoryRates = StatutoryRates {
        federal: TaxRate::from_bps(1500),
        state: TaxRate::from_bps(500),
        social_security: TaxRate::from_bps(620),
        medicare: TaxRate::from_bps(145),
    };
}

// =============================================================================
// Blended Split (Path B)
// =============================================================================

/// Flat total-tax rate used by the batch payroll run.
pub const BATCH_TOTAL_TAX: TaxRate = TaxRate::from_bps(1500);

/// How the batch run splits its flat total tax across the four
/// deduction fields. Counterpart: [`StatutoryRates`] used by
/// per-record creation.
#[derive(Debug, Clone, Copy)]
pub struct BlendedSplit {
    pub federal: TaxRate,
    pub state: TaxRate,
    pub social_security: TaxRate,
    pub medicare: TaxRate,
}

impl BlendedSplit {
    /// federal 60% · state 20% · social security 15% · medicare 5%
    /// (shares of the total tax, not of gross)
    pub const DEFAULT: BlendedSplit = BlendedSplit {
        federal: TaxRate::from_bps(6000),
        state: TaxRate::from_bps(2000),
        social_security: TaxRate::from_bps(1500),
        medicare: TaxRate::from_bps(500),
    };
}

// =============================================================================
// Breakdown
// =============================================================================

/// The fully derived pay figures for one employee and one pay period.
///
/// Plain structured data: the persistence layer copies these fields onto
/// a `PayrollRecord` row, the request layer can serialize them directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_pay: Money,
    pub overtime_pay: Money,
    pub gross_pay: Money,
    pub federal_tax: Money,
    pub state_tax: Money,
    pub social_security: Money,
    pub medicare: Money,
    pub other_deductions: Money,
    pub net_pay: Money,
}

// =============================================================================
// Path A: per-record computation
// =============================================================================

/// Computes a single payroll record's figures from an employee's pay
/// model and the period's hours.
///
/// - Hourly employees: `regular = hours × rate`,
///   `overtime = ot_hours × rate × 1.5`.
/// - Salaried employees: `regular = annual salary / 26` (biweekly),
///   `overtime = 0` **regardless of hours supplied**.
///
/// Gross is regular + overtime; the four statutory rates are applied to
/// gross, each rounded to cents half-up; net is gross minus everything
/// including the caller-supplied `other_deductions`.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// # use tally_core::types::{Employee, EmployeeStatus};
/// # use chrono::{NaiveDate, Utc};
/// use tally_core::payroll::compute_payroll;
///
/// # let employee = Employee {
/// #     id: "e1".into(), owner_id: "o1".into(), employee_id: "EMP-1".into(),
/// #     first_name: "Ada".into(), last_name: "L".into(), email: "a@x".into(),
/// #     phone: None, address: None,
/// #     hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// #     position: None, department: None,
/// #     salary_cents: 0, hourly_rate_cents: Some(2500),
/// #     status: EmployeeStatus::Active,
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// let breakdown = compute_payroll(&employee, 80.0, 5.0, Money::zero()).unwrap();
/// assert_eq!(breakdown.gross_pay.cents(), 218_750); // $2,187.50
/// ```
pub fn compute_payroll(
    employee: &Employee,
    regular_hours: f64,
    overtime_hours: f64,
    other_deductions: Money,
) -> CoreResult<PayrollBreakdown> {
    validate_hours("regular_hours", regular_hours)?;
    validate_hours("overtime_hours", overtime_hours)?;
    validate_amount_cents("other_deductions", other_deductions.cents())?;

    let (regular_pay, overtime_pay) = match employee.hourly_rate() {
        Some(rate) => (
            rate.times_hours(regular_hours),
            rate.times_hours(overtime_hours * OVERTIME_MULTIPLIER),
        ),
        // Salary treated as annual, paid over 26 biweekly periods.
        None => (biweekly_salary(employee.salary()), Money::zero()),
    };

    let gross_pay = regular_pay + overtime_pay;

    let rates = StatutoryRates::DEFAULT;
    let federal_tax = gross_pay.apply_rate(rates.federal);
    let state_tax = gross_pay.apply_rate(rates.state);
    let social_security = gross_pay.apply_rate(rates.social_security);
    let medicare = gross_pay.apply_rate(rates.medicare);

    let net_pay =
        gross_pay - federal_tax - state_tax - social_security - medicare - other_deductions;

    Ok(PayrollBreakdown {
        regular_hours,
        overtime_hours,
        regular_pay,
        overtime_pay,
        gross_pay,
        federal_tax,
        state_tax,
        social_security,
        medicare,
        other_deductions,
        net_pay,
    })
}

// =============================================================================
// Path B: batch computation
// =============================================================================

/// Computes one employee's batch-run figures from their summed hours in
/// the pay-period window.
///
/// Regular hours are capped at 80 per biweekly period, the remainder is
/// overtime. Gross:
/// - hourly: `total_hours × rate` (the overtime premium appears in the
///   pay *lines* but not in gross — carried over as-is, see module docs)
/// - salaried: `(salary / 30) × 14` (this path treats salary as a
///   *monthly* figure, unlike Path A's annual/26 — also carried as-is)
///
/// Withholding is Path B: a flat 15% of gross split 60/20/15/5. Net is
/// gross minus the flat total tax, so the four split fields are the
/// breakdown of the total rather than independently rounded deductions.
pub fn compute_batch_pay(employee: &Employee, total_hours: f64) -> CoreResult<PayrollBreakdown> {
    validate_hours("total_hours", total_hours)?;

    let regular_hours = total_hours.min(REGULAR_HOURS_CAP);
    let overtime_hours = (total_hours - REGULAR_HOURS_CAP).max(0.0);

    // Hourly rate, or the salaried 80h-per-period equivalent (salary/160).
    let line_rate = employee
        .hourly_rate()
        .unwrap_or_else(|| Money::from_cents((employee.salary_cents + 80) / 160));

    let regular_pay = line_rate.times_hours(regular_hours);
    let overtime_pay = line_rate.times_hours(overtime_hours * OVERTIME_MULTIPLIER);

    let gross_pay = match employee.hourly_rate() {
        Some(rate) => rate.times_hours(total_hours),
        None => Money::from_cents(((employee.salary_cents as i128 * 14 + 15) / 30) as i64),
    };

    let total_tax = gross_pay.apply_rate(BATCH_TOTAL_TAX);
    let split = BlendedSplit::DEFAULT;

    Ok(PayrollBreakdown {
        regular_hours,
        overtime_hours,
        regular_pay,
        overtime_pay,
        gross_pay,
        federal_tax: total_tax.apply_rate(split.federal),
        state_tax: total_tax.apply_rate(split.state),
        social_security: total_tax.apply_rate(split.social_security),
        medicare: total_tax.apply_rate(split.medicare),
        other_deductions: Money::zero(),
        net_pay: gross_pay - total_tax,
    })
}

/// Annual salary divided into 26 biweekly periods, rounded half-up.
fn biweekly_salary(annual: Money) -> Money {
    Money::from_cents((annual.cents() + PAY_PERIODS_PER_YEAR / 2) / PAY_PERIODS_PER_YEAR)
}

// =============================================================================
// Unit Tests
// =============================================================================

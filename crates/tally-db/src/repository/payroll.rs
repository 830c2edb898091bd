//! # Payroll Repository
//!
//! Database operations for payroll records, including the batch run.
//!
//! ## Batch Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     run_batch(owner, period)                            │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT active employees of owner                                      │
//! │       │                                                                 │
//! │       ▼  for each employee                                              │
//! │  ┌──────────────────────────────────────────────────┐                  │
//! │  │ record exists for (employee, start, end)?        │── yes ─► skip++  │
//! │  │ sum time-entry hours in window                   │                  │
//! │  │ zero hours?                                      │── yes ─► skip    │
//! │  │ compute_batch_pay (tally-core)                   │                  │
//! │  │ INSERT payroll_record                            │                  │
//! │  └──────────────────────────────────────────────────┘                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT  (all rows or none)                                            │
//! │                                                                         │
//! │  Idempotence: the existence check (plus the UNIQUE index as a          │
//! │  backstop) makes a second identical run create zero rows.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::payroll::{compute_batch_pay, compute_payroll, PayrollBreakdown};
use tally_core::{
    Employee, EmployeeStatus, Money, PayrollRecord, PayrollStatus, PAY_PERIOD_DAYS,
};

const PAYROLL_COLUMNS: &str = r#"
    id, employee_id, pay_period_start, pay_period_end, pay_date,
    regular_hours, overtime_hours, regular_pay_cents, overtime_pay_cents,
    gross_cents, federal_tax_cents, state_tax_cents, social_security_cents,
    medicare_cents, other_deductions_cents, net_cents, status, notes, created_at
"#;

/// Result of a batch payroll run.
#[derive(Debug, Clone)]
pub struct PayrollBatchOutcome {
    /// Records created by this run, in employee order.
    pub created: Vec<PayrollRecord>,
    /// Employees skipped because a record already existed for the
    /// identical (employee, period_start, period_end) triple.
    pub skipped: usize,
}

/// Repository for payroll database operations.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    pool: SqlitePool,
}

impl PayrollRepository {
    /// Creates a new PayrollRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PayrollRepository { pool }
    }

    /// Creates a single payroll record from supplied hours.
    ///
    /// Pay figures come from the per-record calculator (flat statutory
    /// rates). The UNIQUE period index rejects a duplicate triple.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_record(
        &self,
        owner_id: &str,
        employee_id: &str,
        pay_period_start: NaiveDate,
        pay_period_end: NaiveDate,
        pay_date: NaiveDate,
        regular_hours: f64,
        overtime_hours: f64,
        other_deductions: Money,
        notes: Option<String>,
    ) -> DbResult<PayrollRecord> {
        let employee = self.fetch_employee(owner_id, employee_id).await?;

        let breakdown = compute_payroll(&employee, regular_hours, overtime_hours, other_deductions)?;

        let record = build_record(
            &employee.id,
            pay_period_start,
            pay_period_end,
            pay_date,
            &breakdown,
            notes,
        );

        debug!(
            employee_id = %employee.employee_id,
            gross_cents = record.gross_cents,
            "Creating payroll record"
        );

        insert_record(&self.pool, &record).await?;

        Ok(record)
    }

    /// Gets a payroll record by ID.
    pub async fn get(&self, id: &str) -> DbResult<PayrollRecord> {
        let record: Option<PayrollRecord> = sqlx::query_as(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM payroll_records WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| DbError::not_found("PayrollRecord", id))
    }

    /// Lists payroll records for an owner, newest period first, with
    /// optional employee and status filters.
    pub async fn list(
        &self,
        owner_id: &str,
        employee_id: Option<&str>,
        status: Option<PayrollStatus>,
    ) -> DbResult<Vec<PayrollRecord>> {
        let records: Vec<PayrollRecord> = sqlx::query_as(&format!(
            r#"
            SELECT {PAYROLL_COLUMNS} FROM payroll_records
            WHERE employee_id IN (SELECT id FROM employees WHERE owner_id = ?1)
              AND (?2 IS NULL OR employee_id = ?2)
              AND (?3 IS NULL OR status = ?3)
            ORDER BY pay_period_start DESC, created_at DESC
            "#
        ))
        .bind(owner_id)
        .bind(employee_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Updates a record's processing status.
    pub async fn set_status(&self, id: &str, status: PayrollStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE payroll_records SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PayrollRecord", id));
        }

        Ok(())
    }

    /// Runs batch payroll for the trailing 14-day window ending at
    /// `period_end`.
    pub async fn run_batch_trailing(
        &self,
        owner_id: &str,
        period_end: NaiveDate,
        pay_date: NaiveDate,
    ) -> DbResult<PayrollBatchOutcome> {
        let period_start = period_end - Duration::days(PAY_PERIOD_DAYS);
        self.run_batch(owner_id, period_start, period_end, pay_date)
            .await
    }

    /// Runs batch payroll for an explicit period.
    ///
    /// Creates one record per active employee with nonzero hours in the
    /// window, using the batch calculator (blended withholding). All
    /// inserts run in one transaction. Re-running the identical period
    /// creates nothing: employees with an existing record for the triple
    /// are skipped and counted.
    pub async fn run_batch(
        &self,
        owner_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        pay_date: NaiveDate,
    ) -> DbResult<PayrollBatchOutcome> {
        info!(
            owner_id = %owner_id,
            period_start = %period_start,
            period_end = %period_end,
            "Running batch payroll"
        );

        let mut tx = self.pool.begin().await?;

        let employees: Vec<Employee> = sqlx::query_as(
            r#"
            SELECT id, owner_id, employee_id, first_name, last_name, email, phone, address,
                   hire_date, position, department, salary_cents, hourly_rate_cents,
                   status, created_at, updated_at
            FROM employees
            WHERE owner_id = ?1 AND status = ?2
            ORDER BY last_name, first_name
            "#,
        )
        .bind(owner_id)
        .bind(EmployeeStatus::Active)
        .fetch_all(&mut *tx)
        .await?;

        let mut created = Vec::new();
        let mut skipped = 0usize;

        for employee in &employees {
            let exists: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM payroll_records
                WHERE employee_id = ?1 AND pay_period_start = ?2 AND pay_period_end = ?3
                "#,
            )
            .bind(&employee.id)
            .bind(period_start)
            .bind(period_end)
            .fetch_one(&mut *tx)
            .await?;

            if exists > 0 {
                debug!(employee_id = %employee.employee_id, "Period already processed, skipping");
                skipped += 1;
                continue;
            }

            let total_hours: f64 = sqlx::query_scalar(
                r#"
                SELECT COALESCE(SUM(hours_worked), 0.0)
                FROM time_entries
                WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
                "#,
            )
            .bind(&employee.id)
            .bind(period_start)
            .bind(period_end)
            .fetch_one(&mut *tx)
            .await?;

            if total_hours <= 0.0 {
                debug!(employee_id = %employee.employee_id, "No hours in window, skipping");
                continue;
            }

            let breakdown = compute_batch_pay(employee, total_hours)?;
            let record = build_record(
                &employee.id,
                period_start,
                period_end,
                pay_date,
                &breakdown,
                None,
            );

            sqlx::query(
                r#"
                INSERT INTO payroll_records (
                    id, employee_id, pay_period_start, pay_period_end, pay_date,
                    regular_hours, overtime_hours, regular_pay_cents, overtime_pay_cents,
                    gross_cents, federal_tax_cents, state_tax_cents, social_security_cents,
                    medicare_cents, other_deductions_cents, net_cents, status, notes, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
                "#,
            )
            .bind(&record.id)
            .bind(&record.employee_id)
            .bind(record.pay_period_start)
            .bind(record.pay_period_end)
            .bind(record.pay_date)
            .bind(record.regular_hours)
            .bind(record.overtime_hours)
            .bind(record.regular_pay_cents)
            .bind(record.overtime_pay_cents)
            .bind(record.gross_cents)
            .bind(record.federal_tax_cents)
            .bind(record.state_tax_cents)
            .bind(record.social_security_cents)
            .bind(record.medicare_cents)
            .bind(record.other_deductions_cents)
            .bind(record.net_cents)
            .bind(record.status)
            .bind(&record.notes)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

            created.push(record);
        }

        tx.commit().await?;

        info!(
            created = created.len(),
            skipped,
            "Batch payroll complete"
        );

        Ok(PayrollBatchOutcome { created, skipped })
    }

    async fn fetch_employee(&self, owner_id: &str, id: &str) -> DbResult<Employee> {
        let employee: Option<Employee> = sqlx::query_as(
            r#"
            SELECT id, owner_id, employee_id, first_name, last_name, email, phone, address,
                   hire_date, position, department, salary_cents, hourly_rate_cents,
                   status, created_at, updated_at
            FROM employees
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        employee.ok_or_else(|| DbError::not_found("Employee", id))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn build_record(
    employee_id: &str,
    pay_period_start: NaiveDate,
    pay_period_end: NaiveDate,
    pay_date: NaiveDate,
    breakdown: &PayrollBreakdown,
    notes: Option<String>,
) -> PayrollRecord {
    PayrollRecord {
        id: Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        pay_period_start,
        pay_period_end,
        pay_date,
        regular_hours: breakdown.regular_hours,
        overtime_hours: breakdown.overtime_hours,
        regular_pay_cents: breakdown.regular_pay.cents(),
        overtime_pay_cents: breakdown.overtime_pay.cents(),
        gross_cents: breakdown.gross_pay.cents(),
        federal_tax_cents: breakdown.federal_tax.cents(),
        state_tax_cents: breakdown.state_tax.cents(),
        social_security_cents: breakdown.social_security.cents(),
        medicare_cents: breakdown.medicare.cents(),
        other_deductions_cents: breakdown.other_deductions.cents(),
        net_cents: breakdown.net_pay.cents(),
        status: PayrollStatus::Pending,
        notes,
        created_at: Utc::now(),
    }
}

async fn insert_record(pool: &SqlitePool, record: &PayrollRecord) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payroll_records (
            id, employee_id, pay_period_start, pay_period_end, pay_date,
            regular_hours, overtime_hours, regular_pay_cents, overtime_pay_cents,
            gross_cents, federal_tax_cents, state_tax_cents, social_security_cents,
            medicare_cents, other_deductions_cents, net_cents, status, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
        "#,
    )
    .bind(&record.id)
    .bind(&record.employee_id)
    .bind(record.pay_period_start)
    .bind(record.pay_period_end)
    .bind(record.pay_date)
    .bind(record.regular_hours)
    .bind(record.overtime_hours)
    .bind(record.regular_pay_cents)
    .bind(record.overtime_pay_cents)
    .bind(record.gross_cents)
    .bind(record.federal_tax_cents)
    .bind(record.state_tax_cents)
    .bind(record.social_security_cents)
    .bind(record.medicare_cents)
    .bind(record.other_deductions_cents)
    .bind(record.net_cents)
    .bind(record.status)
    .bind(&record.notes)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::employee::NewEmployee;
    use crate::repository::time_entry::NewTimeEntry;
    use chrono::NaiveTime;

    const OWNER: &str = "owner-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_hourly(db: &Database, email: &str, rate_cents: i64) -> Employee {
        db.employees()
            .create(
                OWNER,
                NewEmployee {
                    first_name: "Jean".to_string(),
                    last_name: "Bartik".to_string(),
                    email: email.to_string(),
                    phone: None,
                    address: None,
                    hire_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    position: None,
                    department: None,
                    salary: Money::zero(),
                    hourly_rate: Some(Money::from_cents(rate_cents)),
                },
            )
            .await
            .unwrap()
    }

    async fn log_hours(db: &Database, employee_id: &str, day: NaiveDate, hours: u32) {
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(8 + hours, 0, 0).unwrap();
        db.time_entries()
            .create(NewTimeEntry {
                employee_id: employee_id.to_string(),
                date: day,
                start_time: start,
                end_time: end,
                notes: None,
            })
            .await
            .unwrap();
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    #[tokio::test]
    async fn test_create_record_persists_statutory_breakdown() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "jean@example.com", 2500).await;

        let record = db
            .payroll()
            .create_record(
                OWNER,
                &employee.id,
                d(1),
                d(14),
                d(19),
                80.0,
                5.0,
                Money::zero(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(record.gross_cents, 218_750);
        assert_eq!(record.federal_tax_cents, 32_813);
        assert_eq!(record.net_cents, 158_264);
        assert_eq!(
            record.total_deductions(),
            record.gross() - record.net()
        );

        let stored = db.payroll().get(&record.id).await.unwrap();
        assert_eq!(stored.net_cents, 158_264);
        assert_eq!(stored.status, PayrollStatus::Pending);
    }

    #[tokio::test]
    async fn test_duplicate_period_rejected_on_manual_create() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "dup@example.com", 2500).await;
        let repo = db.payroll();

        repo.create_record(
            OWNER,
            &employee.id,
            d(1),
            d(14),
            d(19),
            40.0,
            0.0,
            Money::zero(),
            None,
        )
        .await
        .unwrap();

        let result = repo
            .create_record(
                OWNER,
                &employee.id,
                d(1),
                d(14),
                d(19),
                40.0,
                0.0,
                Money::zero(),
                None,
            )
            .await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_batch_uses_blended_withholding() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "batch@example.com", 2500).await;

        // 10 days × 8h = 80h, plus one 5h day: 85h total in the window
        for day in 1..=10 {
            log_hours(&db, &employee.id, d(day), 8).await;
        }
        log_hours(&db, &employee.id, d(11), 5).await;

        let outcome = db
            .payroll()
            .run_batch(OWNER, d(1), d(14), d(19))
            .await
            .unwrap();

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.skipped, 0);

        let record = &outcome.created[0];
        assert_eq!(record.regular_hours, 80.0);
        assert_eq!(record.overtime_hours, 5.0);
        assert_eq!(record.gross_cents, 212_500); // rate × total hours
        assert_eq!(record.federal_tax_cents, 19_125); // 60% of flat 15%
        assert_eq!(record.net_cents, 180_625);
    }

    #[tokio::test]
    async fn test_batch_skips_zero_hours_employees() {
        let db = test_db().await;
        let worked = seed_hourly(&db, "worked@example.com", 2000).await;
        let _idle = seed_hourly(&db, "idle@example.com", 2000).await;

        log_hours(&db, &worked.id, d(3), 6).await;

        let outcome = db
            .payroll()
            .run_batch(OWNER, d(1), d(14), d(19))
            .await
            .unwrap();

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].employee_id, worked.id);
    }

    #[tokio::test]
    async fn test_second_identical_run_creates_nothing() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "rerun@example.com", 2000).await;
        log_hours(&db, &employee.id, d(3), 8).await;

        let first = db
            .payroll()
            .run_batch(OWNER, d(1), d(14), d(19))
            .await
            .unwrap();
        assert_eq!(first.created.len(), 1);

        let second = db
            .payroll()
            .run_batch(OWNER, d(1), d(14), d(19))
            .await
            .unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.skipped, 1);

        let records = db.payroll().list(OWNER, None, None).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_employees_excluded_from_batch() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "gone@example.com", 2000).await;
        log_hours(&db, &employee.id, d(3), 8).await;

        db.employees()
            .update(
                OWNER,
                &employee.id,
                crate::repository::employee::EmployeeUpdate {
                    status: Some(EmployeeStatus::Terminated),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let outcome = db
            .payroll()
            .run_batch(OWNER, d(1), d(14), d(19))
            .await
            .unwrap();
        assert!(outcome.created.is_empty());
    }

    #[tokio::test]
    async fn test_set_status() {
        let db = test_db().await;
        let employee = seed_hourly(&db, "status@example.com", 2000).await;

        let record = db
            .payroll()
            .create_record(
                OWNER,
                &employee.id,
                d(1),
                d(14),
                d(19),
                40.0,
                0.0,
                Money::zero(),
                None,
            )
            .await
            .unwrap();

        db.payroll()
            .set_status(&record.id, PayrollStatus::Processed)
            .await
            .unwrap();
        let stored = db.payroll().get(&record.id).await.unwrap();
        assert_eq!(stored.status, PayrollStatus::Processed);
    }
}

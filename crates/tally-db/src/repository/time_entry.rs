//! # Time Entry Repository
//!
//! Database operations for clock-in/clock-out records.
//!
//! Hours and the overtime flag are derived in tally-core from the raw
//! times before the row is written, so stored entries always satisfy
//! `hours_worked = end − start` and `is_overtime = hours > 8`.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::timesheet::compute_time_entry_hours;
use tally_core::TimeEntry;

const TIME_ENTRY_COLUMNS: &str = r#"
    id, employee_id, date, start_time, end_time, hours_worked, is_overtime,
    notes, created_at
"#;

/// Input for creating a time entry.
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub employee_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

/// Repository for time entry database operations.
#[derive(Debug, Clone)]
pub struct TimeEntryRepository {
    pool: SqlitePool,
}

impl TimeEntryRepository {
    /// Creates a new TimeEntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TimeEntryRepository { pool }
    }

    /// Creates a time entry with derived hours.
    ///
    /// Rejects an end time at or before the start time before anything
    /// is written.
    pub async fn create(&self, input: NewTimeEntry) -> DbResult<TimeEntry> {
        let derived = compute_time_entry_hours(input.start_time, input.end_time)?;

        let entry = TimeEntry {
            id: Uuid::new_v4().to_string(),
            employee_id: input.employee_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            hours_worked: derived.hours_worked,
            is_overtime: derived.is_overtime,
            notes: input.notes,
            created_at: Utc::now(),
        };

        debug!(
            employee_id = %entry.employee_id,
            date = %entry.date,
            hours = entry.hours_worked,
            "Creating time entry"
        );

        sqlx::query(
            r#"
            INSERT INTO time_entries (
                id, employee_id, date, start_time, end_time, hours_worked, is_overtime,
                notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.employee_id)
        .bind(entry.date)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.hours_worked)
        .bind(entry.is_overtime)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Gets a time entry by ID.
    pub async fn get(&self, id: &str) -> DbResult<TimeEntry> {
        let entry: Option<TimeEntry> = sqlx::query_as(&format!(
            "SELECT {TIME_ENTRY_COLUMNS} FROM time_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        entry.ok_or_else(|| DbError::not_found("TimeEntry", id))
    }

    /// Lists an employee's entries within an inclusive date range,
    /// oldest first.
    pub async fn list(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<TimeEntry>> {
        let entries: Vec<TimeEntry> = sqlx::query_as(&format!(
            r#"
            SELECT {TIME_ENTRY_COLUMNS} FROM time_entries
            WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date, start_time
            "#
        ))
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Deletes a time entry.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("TimeEntry", id));
        }

        Ok(())
    }

    /// Sums an employee's hours over an inclusive date range.
    ///
    /// The batch payroll run feeds this through the 80-hour cap.
    pub async fn total_hours(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<f64> {
        let hours: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(hours_worked), 0.0)
            FROM time_entries
            WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
            "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(hours)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::employee::NewEmployee;
    use tally_core::Money;

    const OWNER: &str = "owner-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_employee(db: &Database) -> String {
        db.employees()
            .create(
                OWNER,
                NewEmployee {
                    first_name: "Tom".to_string(),
                    last_name: "Kilburn".to_string(),
                    email: "tom@example.com".to_string(),
                    phone: None,
                    address: None,
                    hire_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    position: None,
                    department: None,
                    salary: Money::zero(),
                    hourly_rate: Some(Money::from_cents(2000)),
                },
            )
            .await
            .unwrap()
            .id
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_create_derives_hours_and_overtime() {
        let db = test_db().await;
        let employee_id = seed_employee(&db).await;
        let repo = db.time_entries();

        let entry = repo
            .create(NewTimeEntry {
                employee_id: employee_id.clone(),
                date: d(2),
                start_time: t(9, 0),
                end_time: t(17, 30),
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(entry.hours_worked, 8.5);
        assert!(entry.is_overtime);

        let stored = repo.get(&entry.id).await.unwrap();
        assert_eq!(stored.hours_worked, 8.5);
        assert!(stored.is_overtime);
    }

    #[tokio::test]
    async fn test_invalid_time_range_writes_nothing() {
        let db = test_db().await;
        let employee_id = seed_employee(&db).await;
        let repo = db.time_entries();

        let result = repo
            .create(NewTimeEntry {
                employee_id: employee_id.clone(),
                date: d(2),
                start_time: t(17, 0),
                end_time: t(9, 0),
                notes: None,
            })
            .await;
        assert!(result.is_err());

        let entries = repo.list(&employee_id, d(1), d(31)).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_employee_rejected_by_foreign_key() {
        let db = test_db().await;
        let repo = db.time_entries();

        let result = repo
            .create(NewTimeEntry {
                employee_id: "no-such-employee".to_string(),
                date: d(2),
                start_time: t(9, 0),
                end_time: t(17, 0),
                notes: None,
            })
            .await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_total_hours_sums_range_only() {
        let db = test_db().await;
        let employee_id = seed_employee(&db).await;
        let repo = db.time_entries();

        for (day, end) in [(2, t(17, 0)), (3, t(13, 0)), (20, t(17, 0))] {
            repo.create(NewTimeEntry {
                employee_id: employee_id.clone(),
                date: d(day),
                start_time: t(9, 0),
                end_time: end,
                notes: None,
            })
            .await
            .unwrap();
        }

        // Only March 2-3 fall in the window: 8 + 4 hours
        let hours = repo.total_hours(&employee_id, d(1), d(14)).await.unwrap();
        assert_eq!(hours, 12.0);

        // Empty window sums to zero
        let hours = repo.total_hours(&employee_id, d(25), d(31)).await.unwrap();
        assert_eq!(hours, 0.0);
    }
}

//! # Employee Repository
//!
//! Database operations for employee records.
//!
//! Employees carry exactly one pay model: an `hourly_rate_cents` makes
//! them hourly, its absence makes them salaried. The payroll repository
//! reads this to pick a calculator, nothing here computes pay.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::validation::{validate_amount_cents, validate_required_text};
use tally_core::{Employee, EmployeeStatus, Money};

const EMPLOYEE_COLUMNS: &str = r#"
    id, owner_id, employee_id, first_name, last_name, email, phone, address,
    hire_date, position, department, salary_cents, hourly_rate_cents,
    status, created_at, updated_at
"#;

// =============================================================================
// Input Types
// =============================================================================

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub hire_date: NaiveDate,
    pub position: Option<String>,
    pub department: Option<String>,
    /// Annual salary; ignored by the per-record calculator when an
    /// hourly rate is present.
    pub salary: Money,
    pub hourly_rate: Option<Money>,
}

/// Field patch for updating an employee. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<Money>,
    /// `Some(None)` clears the hourly rate (switches to salaried).
    pub hourly_rate: Option<Option<Money>>,
    pub status: Option<EmployeeStatus>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Creates an employee with a generated business identifier.
    pub async fn create(&self, owner_id: &str, input: NewEmployee) -> DbResult<Employee> {
        validate_required_text("first_name", &input.first_name, 100)?;
        validate_required_text("last_name", &input.last_name, 100)?;
        validate_required_text("email", &input.email, 200)?;
        validate_amount_cents("salary", input.salary.cents())?;
        if let Some(rate) = input.hourly_rate {
            validate_amount_cents("hourly_rate", rate.cents())?;
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let employee_id = generate_employee_id();

        debug!(id = %id, employee_id = %employee_id, "Creating employee");

        let employee = Employee {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            employee_id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone,
            address: input.address,
            hire_date: input.hire_date,
            position: input.position,
            department: input.department,
            salary_cents: input.salary.cents(),
            hourly_rate_cents: input.hourly_rate.map(|r| r.cents()),
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, owner_id, employee_id, first_name, last_name, email, phone, address,
                hire_date, position, department, salary_cents, hourly_rate_cents,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.owner_id)
        .bind(&employee.employee_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.address)
        .bind(employee.hire_date)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary_cents)
        .bind(employee.hourly_rate_cents)
        .bind(employee.status)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Gets an employee by ID, scoped to their owner.
    pub async fn get(&self, owner_id: &str, id: &str) -> DbResult<Employee> {
        let employee: Option<Employee> = sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        employee.ok_or_else(|| DbError::not_found("Employee", id))
    }

    /// Lists employees for an owner, alphabetically by last name.
    pub async fn list(
        &self,
        owner_id: &str,
        status: Option<EmployeeStatus>,
    ) -> DbResult<Vec<Employee>> {
        let employees: Vec<Employee> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {EMPLOYEE_COLUMNS} FROM employees
                    WHERE owner_id = ?1 AND status = ?2
                    ORDER BY last_name, first_name
                    "#
                ))
                .bind(owner_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {EMPLOYEE_COLUMNS} FROM employees
                    WHERE owner_id = ?1
                    ORDER BY last_name, first_name
                    "#
                ))
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(employees)
    }

    /// Updates an employee.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: EmployeeUpdate,
    ) -> DbResult<Employee> {
        let mut employee = self.get(owner_id, id).await?;

        if let Some(first_name) = patch.first_name {
            validate_required_text("first_name", &first_name, 100)?;
            employee.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            validate_required_text("last_name", &last_name, 100)?;
            employee.last_name = last_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            validate_required_text("email", &email, 200)?;
            employee.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            employee.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            employee.address = Some(address);
        }
        if let Some(position) = patch.position {
            employee.position = Some(position);
        }
        if let Some(department) = patch.department {
            employee.department = Some(department);
        }
        if let Some(salary) = patch.salary {
            validate_amount_cents("salary", salary.cents())?;
            employee.salary_cents = salary.cents();
        }
        if let Some(hourly_rate) = patch.hourly_rate {
            if let Some(rate) = hourly_rate {
                validate_amount_cents("hourly_rate", rate.cents())?;
            }
            employee.hourly_rate_cents = hourly_rate.map(|r| r.cents());
        }
        if let Some(status) = patch.status {
            employee.status = status;
        }

        employee.updated_at = Utc::now();

        debug!(id = %id, "Updating employee");

        sqlx::query(
            r#"
            UPDATE employees SET
                first_name = ?1, last_name = ?2, email = ?3, phone = ?4, address = ?5,
                position = ?6, department = ?7, salary_cents = ?8, hourly_rate_cents = ?9,
                status = ?10, updated_at = ?11
            WHERE id = ?12 AND owner_id = ?13
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.address)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary_cents)
        .bind(employee.hourly_rate_cents)
        .bind(employee.status)
        .bind(employee.updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Deletes an employee. Time entries and payroll records cascade.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting employee");

        let result = sqlx::query("DELETE FROM employees WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }
}

/// Generates an employee business identifier: `EMP-XXXXXXXX`.
fn generate_employee_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("EMP-{suffix}")
}

// =============================================================================
// Tests
// =============================================================================

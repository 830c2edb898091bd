//! # Expense Repository
//!
//! Database operations for expenses and expense categories.
//!
//! Categories are shared labels referenced by name; deleting or renaming
//! a category never touches recorded expenses.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::validation::{validate_amount_cents, validate_required_text};
use tally_core::{Expense, ExpenseCategory, ExpenseStatus, Money, PaymentMethod};

const EXPENSE_COLUMNS: &str = r#"
    id, owner_id, category, description, amount_cents, expense_date, vendor,
    receipt_url, payment_method, status, notes, created_at, updated_at
"#;

// =============================================================================
// Input Types
// =============================================================================

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub expense_date: NaiveDate,
    pub vendor: Option<String>,
    pub receipt_url: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

/// Field patch for updating an expense. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub expense_date: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub receipt_url: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<ExpenseStatus>,
    pub notes: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Creates an expense in pending status.
    pub async fn create(&self, owner_id: &str, input: NewExpense) -> DbResult<Expense> {
        validate_required_text("category", &input.category, 100)?;
        validate_required_text("description", &input.description, 500)?;
        validate_amount_cents("amount", input.amount.cents())?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            category: input.category.trim().to_string(),
            description: input.description.trim().to_string(),
            amount_cents: input.amount.cents(),
            expense_date: input.expense_date,
            vendor: input.vendor,
            receipt_url: input.receipt_url,
            payment_method: input.payment_method,
            status: ExpenseStatus::Pending,
            notes: input.notes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        debug!(id = %expense.id, category = %expense.category, "Creating expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, owner_id, category, description, amount_cents, expense_date, vendor,
                receipt_url, payment_method, status, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.owner_id)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.expense_date)
        .bind(&expense.vendor)
        .bind(&expense.receipt_url)
        .bind(expense.payment_method)
        .bind(expense.status)
        .bind(&expense.notes)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Gets an expense by ID, scoped to its owner.
    pub async fn get(&self, owner_id: &str, id: &str) -> DbResult<Expense> {
        let expense: Option<Expense> = sqlx::query_as(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        expense.ok_or_else(|| DbError::not_found("Expense", id))
    }

    /// Lists expenses for an owner, newest first, with optional category
    /// and date-range filters.
    pub async fn list(
        &self,
        owner_id: &str,
        category: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<Expense>> {
        // Optional filters are folded into the WHERE clause; a NULL
        // parameter disables its condition.
        let expenses: Vec<Expense> = sqlx::query_as(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS} FROM expenses
            WHERE owner_id = ?1
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR expense_date >= ?3)
              AND (?4 IS NULL OR expense_date <= ?4)
            ORDER BY expense_date DESC, created_at DESC
            "#
        ))
        .bind(owner_id)
        .bind(category)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Updates an expense.
    pub async fn update(&self, owner_id: &str, id: &str, patch: ExpenseUpdate) -> DbResult<Expense> {
        let mut expense = self.get(owner_id, id).await?;

        if let Some(category) = patch.category {
            validate_required_text("category", &category, 100)?;
            expense.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            validate_required_text("description", &description, 500)?;
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            validate_amount_cents("amount", amount.cents())?;
            expense.amount_cents = amount.cents();
        }
        if let Some(date) = patch.expense_date {
            expense.expense_date = date;
        }
        if let Some(vendor) = patch.vendor {
            expense.vendor = Some(vendor);
        }
        if let Some(url) = patch.receipt_url {
            expense.receipt_url = Some(url);
        }
        if let Some(method) = patch.payment_method {
            expense.payment_method = Some(method);
        }
        if let Some(status) = patch.status {
            expense.status = status;
        }
        if let Some(notes) = patch.notes {
            expense.notes = Some(notes);
        }

        expense.updated_at = Utc::now();

        debug!(id = %id, "Updating expense");

        sqlx::query(
            r#"
            UPDATE expenses SET
                category = ?1, description = ?2, amount_cents = ?3, expense_date = ?4,
                vendor = ?5, receipt_url = ?6, payment_method = ?7, status = ?8,
                notes = ?9, updated_at = ?10
            WHERE id = ?11 AND owner_id = ?12
            "#,
        )
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.expense_date)
        .bind(&expense.vendor)
        .bind(&expense.receipt_url)
        .bind(expense.payment_method)
        .bind(expense.status)
        .bind(&expense.notes)
        .bind(expense.updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// Creates an expense category. Names are unique.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> DbResult<ExpenseCategory> {
        validate_required_text("name", name, 100)?;

        let category = ExpenseCategory {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            description: description.map(str::to_string),
            color: color.map(str::to_string),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO expense_categories (id, name, description, color, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories, alphabetically.
    pub async fn list_categories(&self) -> DbResult<Vec<ExpenseCategory>> {
        let categories: Vec<ExpenseCategory> = sqlx::query_as(
            r#"
            SELECT id, name, description, color, created_at
            FROM expense_categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

// =============================================================================
// Tests
// =============================================================================

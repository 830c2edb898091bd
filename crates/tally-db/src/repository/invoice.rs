//! # Invoice Repository
//!
//! Database operations for invoices, their line items, and payments.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Lifecycle                                 │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Invoice { status: Draft }                           │
//! │         (header + items + computed totals in one transaction)          │
//! │                                                                         │
//! │  2. EDIT                                                               │
//! │     └── update() → replaces items, recomputes totals                   │
//! │                                                                         │
//! │  3. SEND                                                               │
//! │     └── send() → Invoice { status: Sent }   (draft only)               │
//! │                                                                         │
//! │  4. COLLECT                                                            │
//! │     └── add_payment() → Payment                                        │
//! │         (flips status to Paid when payments cover the total,           │
//! │          atomically in the same transaction as the insert)             │
//! │                                                                         │
//! │  5. (OR) AGE OUT                                                       │
//! │     └── mark_overdue() → Sent invoices past due_date become Overdue    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::invoice::{compute_invoice_totals, LineInput};
use tally_core::validation::{validate_payment_amount, validate_required_text};
use tally_core::{
    CoreError, Invoice, InvoiceItem, InvoiceStatus, Money, Payment, PaymentMethod, TaxRate,
};

const INVOICE_COLUMNS: &str = r#"
    id, owner_id, invoice_number, client_name, client_email, client_address,
    issue_date, due_date, subtotal_cents, tax_rate_bps, tax_cents, total_cents,
    status, notes, created_at, updated_at
"#;

// =============================================================================
// Input Types
// =============================================================================

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub tax_rate: TaxRate,
    pub notes: Option<String>,
    pub items: Vec<NewInvoiceItem>,
}

/// Input for one line item.
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: Money,
}

/// Field patch for updating an invoice. `None` fields are left alone;
/// `items: Some(..)` replaces the whole item list and recomputes totals.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub tax_rate: Option<TaxRate>,
    pub notes: Option<String>,
    pub items: Option<Vec<NewInvoiceItem>>,
}

/// Input for recording a payment against an invoice.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub method: Option<PaymentMethod>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Creates an invoice with its line items.
    ///
    /// Totals are computed from the items before anything is written;
    /// header and items are inserted in one transaction.
    pub async fn create(&self, owner_id: &str, input: NewInvoice) -> DbResult<Invoice> {
        validate_required_text("client_name", &input.client_name, 200)?;
        for item in &input.items {
            validate_required_text("description", &item.description, 500)?;
        }

        let line_inputs: Vec<LineInput> = input
            .items
            .iter()
            .map(|i| LineInput::new(i.quantity, i.unit_price))
            .collect();
        let totals = compute_invoice_totals(&line_inputs, input.tax_rate)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let invoice_number = generate_invoice_number(input.issue_date);

        debug!(id = %id, invoice_number = %invoice_number, "Creating invoice");

        let invoice = Invoice {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            invoice_number,
            client_name: input.client_name.trim().to_string(),
            client_email: input.client_email,
            client_address: input.client_address,
            issue_date: input.issue_date,
            due_date: input.due_date,
            subtotal_cents: totals.subtotal.cents(),
            tax_rate_bps: input.tax_rate.bps(),
            tax_cents: totals.tax_amount.cents(),
            total_cents: totals.total.cents(),
            status: InvoiceStatus::Draft,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, owner_id, invoice_number, client_name, client_email, client_address,
                issue_date, due_date, subtotal_cents, tax_rate_bps, tax_cents, total_cents,
                status, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.owner_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.client_name)
        .bind(&invoice.client_email)
        .bind(&invoice.client_address)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.status)
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &input.items {
            insert_item(&mut tx, &invoice.id, item).await?;
        }

        tx.commit().await?;

        Ok(invoice)
    }

    /// Gets an invoice by ID, scoped to its owner.
    pub async fn get(&self, owner_id: &str, id: &str) -> DbResult<Invoice> {
        let invoice: Option<Invoice> = sqlx::query_as(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 AND owner_id = ?2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        invoice.ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Lists invoices for an owner, newest issue date first.
    pub async fn list(
        &self,
        owner_id: &str,
        status: Option<InvoiceStatus>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Invoice>> {
        let invoices: Vec<Invoice> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS} FROM invoices
                    WHERE owner_id = ?1 AND status = ?2
                    ORDER BY issue_date DESC, created_at DESC
                    LIMIT ?3 OFFSET ?4
                    "#
                ))
                .bind(owner_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS} FROM invoices
                    WHERE owner_id = ?1
                    ORDER BY issue_date DESC, created_at DESC
                    LIMIT ?2 OFFSET ?3
                    "#
                ))
                .bind(owner_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(invoices)
    }

    /// Gets all line items for an invoice.
    pub async fn items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let items: Vec<InvoiceItem> = sqlx::query_as(
            r#"
            SELECT id, invoice_id, description, quantity, unit_price_cents, total_cents
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates an invoice.
    ///
    /// When `items` is present the existing item list is replaced and
    /// totals are recomputed from scratch. Item replacement and the
    /// header update run in one transaction.
    pub async fn update(&self, owner_id: &str, id: &str, patch: InvoiceUpdate) -> DbResult<Invoice> {
        let mut invoice = self.get(owner_id, id).await?;

        if let Some(name) = patch.client_name {
            validate_required_text("client_name", &name, 200)?;
            invoice.client_name = name.trim().to_string();
        }
        if let Some(email) = patch.client_email {
            invoice.client_email = Some(email);
        }
        if let Some(address) = patch.client_address {
            invoice.client_address = Some(address);
        }
        if let Some(issue_date) = patch.issue_date {
            invoice.issue_date = issue_date;
        }
        if let Some(due_date) = patch.due_date {
            invoice.due_date = due_date;
        }
        if let Some(rate) = patch.tax_rate {
            invoice.tax_rate_bps = rate.bps();
        }
        if let Some(notes) = patch.notes {
            invoice.notes = Some(notes);
        }

        let mut tx = self.pool.begin().await?;

        if let Some(ref items) = patch.items {
            for item in items {
                validate_required_text("description", &item.description, 500)?;
            }

            let line_inputs: Vec<LineInput> = items
                .iter()
                .map(|i| LineInput::new(i.quantity, i.unit_price))
                .collect();
            let totals = compute_invoice_totals(&line_inputs, invoice.tax_rate())?;

            invoice.subtotal_cents = totals.subtotal.cents();
            invoice.tax_cents = totals.tax_amount.cents();
            invoice.total_cents = totals.total.cents();

            sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for item in items {
                insert_item(&mut tx, id, item).await?;
            }
        } else if patch.tax_rate.is_some() {
            // Rate changed without new items: recompute from the stored
            // subtotal so the invariant total = subtotal + tax holds.
            let tax = Money::from_cents(invoice.subtotal_cents).apply_rate(invoice.tax_rate());
            invoice.tax_cents = tax.cents();
            invoice.total_cents = invoice.subtotal_cents + tax.cents();
        }

        invoice.updated_at = Utc::now();

        debug!(id = %id, "Updating invoice");

        sqlx::query(
            r#"
            UPDATE invoices SET
                client_name = ?1, client_email = ?2, client_address = ?3,
                issue_date = ?4, due_date = ?5,
                subtotal_cents = ?6, tax_rate_bps = ?7, tax_cents = ?8, total_cents = ?9,
                notes = ?10, updated_at = ?11
            WHERE id = ?12 AND owner_id = ?13
            "#,
        )
        .bind(&invoice.client_name)
        .bind(&invoice.client_email)
        .bind(&invoice.client_address)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(&invoice.notes)
        .bind(invoice.updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(invoice)
    }

    /// Deletes an invoice. Items and payments cascade.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Marks a draft invoice as sent.
    ///
    /// Only drafts can be sent; any other status is rejected.
    pub async fn send(&self, owner_id: &str, id: &str) -> DbResult<Invoice> {
        let invoice = self.get(owner_id, id).await?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(DbError::Core(CoreError::InvalidInvoiceStatus {
                invoice_id: id.to_string(),
                current_status: invoice.status.as_str().to_string(),
            }));
        }

        debug!(id = %id, "Sending invoice");

        let now = Utc::now();
        sqlx::query(
            "UPDATE invoices SET status = ?1, updated_at = ?2 WHERE id = ?3 AND owner_id = ?4",
        )
        .bind(InvoiceStatus::Sent)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(Invoice {
            status: InvoiceStatus::Sent,
            updated_at: now,
            ..invoice
        })
    }

    /// Records a payment against an invoice.
    ///
    /// The payment insert and the paid-status flip happen in one
    /// transaction: the status update's WHERE clause re-checks the
    /// payment sum against the stored total, so two concurrent partial
    /// payments cannot both observe a stale sum and leave the invoice
    /// unpaid (or flip it early).
    pub async fn add_payment(&self, invoice_id: &str, input: NewPayment) -> DbResult<Payment> {
        validate_payment_amount(input.amount.cents())?;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            amount_cents: input.amount.cents(),
            payment_date: input.payment_date,
            method: input.method,
            reference: input.reference,
            notes: input.notes,
            created_at: Utc::now(),
        };

        debug!(invoice_id = %invoice_id, amount_cents = payment.amount_cents, "Recording payment");

        let mut tx = self.pool.begin().await?;

        // FK violation surfaces here if the invoice doesn't exist.
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, invoice_id, amount_cents, payment_date, method, reference, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.invoice_id)
        .bind(payment.amount_cents)
        .bind(payment.payment_date)
        .bind(payment.method)
        .bind(&payment.reference)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        // Conditional flip: the sum is evaluated inside the same
        // transaction that inserted the payment.
        sqlx::query(
            r#"
            UPDATE invoices
            SET status = 'paid', updated_at = ?1
            WHERE id = ?2
              AND status != 'paid'
              AND (SELECT COALESCE(SUM(amount_cents), 0)
                   FROM payments WHERE invoice_id = ?2) >= total_cents
            "#,
        )
        .bind(Utc::now())
        .bind(invoice_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// Gets all payments for an invoice, oldest first.
    pub async fn payments(&self, invoice_id: &str) -> DbResult<Vec<Payment>> {
        let payments: Vec<Payment> = sqlx::query_as(
            r#"
            SELECT id, invoice_id, amount_cents, payment_date, method, reference, notes, created_at
            FROM payments
            WHERE invoice_id = ?1
            ORDER BY payment_date, created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Sum of payments recorded against an invoice.
    pub async fn total_paid(&self, invoice_id: &str) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Flips sent invoices past their due date to overdue.
    ///
    /// Returns the number of invoices transitioned. Invoked explicitly
    /// with an as-of date rather than on a clock, so it is testable and
    /// replayable.
    pub async fn mark_overdue(&self, owner_id: &str, as_of: NaiveDate) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET status = 'overdue', updated_at = ?1
            WHERE owner_id = ?2 AND status = 'sent' AND due_date < ?3
            "#,
        )
        .bind(Utc::now())
        .bind(owner_id)
        .bind(as_of)
        .execute(&self.pool)
        .await?;

        debug!(owner_id = %owner_id, count = result.rows_affected(), "Marked invoices overdue");

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    invoice_id: &str,
    item: &NewInvoiceItem,
) -> DbResult<()> {
    let line_total = LineInput::new(item.quantity, item.unit_price).total();

    sqlx::query(
        r#"
        INSERT INTO invoice_items (id, invoice_id, description, quantity, unit_price_cents, total_cents)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(invoice_id)
    .bind(&item.description)
    .bind(item.quantity)
    .bind(item.unit_price.cents())
    .bind(line_total.cents())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Generates an invoice number: `INV-YYYYMMDD-XXXXXXXX`.
///
/// Date prefix for humans, random suffix for uniqueness.
fn generate_invoice_number(issue_date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("INV-{}-{}", issue_date.format("%Y%m%d"), suffix)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const OWNER: &str = "owner-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_invoice() -> NewInvoice {
        NewInvoice {
            client_name: "Acme Corp".to_string(),
            client_email: Some("billing@acme.example".to_string()),
            client_address: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            tax_rate: TaxRate::from_bps(825),
            notes: None,
            items: vec![
                NewInvoiceItem {
                    description: "Consulting".to_string(),
                    quantity: 2.5,
                    unit_price: Money::from_cents(10000),
                },
                NewInvoiceItem {
                    description: "Support retainer".to_string(),
                    quantity: 1.0,
                    unit_price: Money::from_cents(50000),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_create_persists_computed_totals() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();

        // 2.5 × $100.00 + 1 × $500.00 = $750.00; 8.25% = $61.88
        assert_eq!(invoice.subtotal_cents, 75_000);
        assert_eq!(invoice.tax_cents, 6_188);
        assert_eq!(invoice.total_cents, 81_188);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert!(invoice.invoice_number.starts_with("INV-20260215-"));

        let stored = repo.get(OWNER, &invoice.id).await.unwrap();
        assert_eq!(stored.total_cents, invoice.total_cents);

        let items = repo.items(&invoice.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].total_cents, 25_000);
    }

    #[tokio::test]
    async fn test_get_is_owner_scoped() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();

        assert!(repo.get("other-owner", &invoice.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let db = test_db().await;
        let repo = db.invoices();

        let a = repo.create(OWNER, sample_invoice()).await.unwrap();
        let _b = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.send(OWNER, &a.id).await.unwrap();

        let sent = repo
            .list(OWNER, Some(InvoiceStatus::Sent), 50, 0)
            .await
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, a.id);

        let all = repo.list(OWNER, None, 50, 0).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_recomputes() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();

        let patch = InvoiceUpdate {
            items: Some(vec![NewInvoiceItem {
                description: "Flat fee".to_string(),
                quantity: 1.0,
                unit_price: Money::from_cents(20000),
            }]),
            ..Default::default()
        };
        let updated = repo.update(OWNER, &invoice.id, patch).await.unwrap();

        assert_eq!(updated.subtotal_cents, 20_000);
        assert_eq!(updated.tax_cents, 1_650); // 8.25%
        assert_eq!(updated.total_cents, 21_650);

        let items = repo.items(&invoice.id).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_send_rejects_non_draft() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.send(OWNER, &invoice.id).await.unwrap();

        // Already sent
        assert!(repo.send(OWNER, &invoice.id).await.is_err());
    }

    #[tokio::test]
    async fn test_partial_payment_does_not_flip_status() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.send(OWNER, &invoice.id).await.unwrap();

        repo.add_payment(
            &invoice.id,
            NewPayment {
                amount: Money::from_cents(40_000),
                payment_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                method: Some(PaymentMethod::Check),
                reference: Some("1042".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();

        let stored = repo.get(OWNER, &invoice.id).await.unwrap();
        assert_eq!(stored.status, InvoiceStatus::Sent);
        assert!(stored.is_outstanding());
        assert_eq!(repo.total_paid(&invoice.id).await.unwrap().cents(), 40_000);
    }

    #[tokio::test]
    async fn test_covering_payment_flips_to_paid() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.send(OWNER, &invoice.id).await.unwrap();

        for amount in [40_000, 41_188] {
            repo.add_payment(
                &invoice.id,
                NewPayment {
                    amount: Money::from_cents(amount),
                    payment_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                    method: Some(PaymentMethod::BankTransfer),
                    reference: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        }

        let stored = repo.get(OWNER, &invoice.id).await.unwrap();
        assert_eq!(stored.status, InvoiceStatus::Paid);
        assert!(!stored.is_outstanding());

        let payments = repo.payments(&invoice.id).await.unwrap();
        assert_eq!(payments.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_payment_rejected() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();

        let result = repo
            .add_payment(
                &invoice.id,
                NewPayment {
                    amount: Money::zero(),
                    payment_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                    method: None,
                    reference: None,
                    notes: None,
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mark_overdue() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.send(OWNER, &invoice.id).await.unwrap();

        // Before the due date: nothing to do
        let n = repo
            .mark_overdue(OWNER, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
            .await
            .unwrap();
        assert_eq!(n, 0);

        // Past the due date
        let n = repo
            .mark_overdue(OWNER, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap())
            .await
            .unwrap();
        assert_eq!(n, 1);

        let stored = repo.get(OWNER, &invoice.id).await.unwrap();
        assert_eq!(stored.status, InvoiceStatus::Overdue);
    }

    #[tokio::test]
    async fn test_delete_cascades_items_and_payments() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = repo.create(OWNER, sample_invoice()).await.unwrap();
        repo.add_payment(
            &invoice.id,
            NewPayment {
                amount: Money::from_cents(1000),
                payment_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                method: None,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap();

        repo.delete(OWNER, &invoice.id).await.unwrap();

        assert!(repo.get(OWNER, &invoice.id).await.is_err());
        assert!(repo.items(&invoice.id).await.unwrap().is_empty());
        assert!(repo.payments(&invoice.id).await.unwrap().is_empty());
    }
}

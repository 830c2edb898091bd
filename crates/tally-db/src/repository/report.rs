//! # Report Repository
//!
//! Owner-scoped aggregation queries behind the reporting surface.
//!
//! All sums run in SQL with `COALESCE(SUM(..), 0)` so an empty range
//! yields zeros, never NULL. Ratio math (growth, margin, payment rate)
//! lives in `tally_core::report` and is division-guarded there.
//!
//! Attribution rules:
//! - Revenue: **paid** invoices, by `issue_date`
//! - Expenses: all recorded expenses, by `expense_date`
//! - Payroll: record gross, by `pay_date`

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tally_core::report::{
    growth_percent, month_buckets, month_start, next_month, payment_rate, prev_month,
    profit_margin, CategoryTotal, DashboardOverview, EmployeePayrollTotal, FinancialSummary,
    MonthlyBreakdown, QuickStats,
};
use tally_core::Money;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Financial summary over an inclusive date range, with a
    /// month-bucketed revenue/expense/profit series.
    pub async fn financial_summary(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<FinancialSummary> {
        debug!(owner_id = %owner_id, start = %start, end = %end, "Building financial summary");

        let total_revenue = self.revenue_between(owner_id, start, end).await?;
        let total_expenses = self.expenses_between(owner_id, start, end).await?;
        let total_payroll = self.payroll_between(owner_id, start, end).await?;

        let (outstanding_amount, outstanding_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cents), 0), COUNT(*)
            FROM invoices
            WHERE owner_id = ?1
              AND status IN ('sent', 'overdue')
              AND issue_date >= ?2 AND issue_date <= ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let net_profit = total_revenue - total_expenses - total_payroll;

        let mut monthly_breakdown = Vec::new();
        for (bucket_start, month) in month_buckets(start, end) {
            let bucket_end = next_month(bucket_start);
            let revenue = self
                .revenue_half_open(owner_id, bucket_start, bucket_end)
                .await?;
            let expenses = self
                .expenses_half_open(owner_id, bucket_start, bucket_end)
                .await?;

            monthly_breakdown.push(MonthlyBreakdown {
                month,
                revenue,
                expenses,
                profit: revenue - expenses,
            });
        }

        Ok(FinancialSummary {
            period_start: start,
            period_end: end,
            total_revenue,
            outstanding_amount: Money::from_cents(outstanding_amount),
            outstanding_count,
            total_expenses,
            total_payroll,
            net_profit,
            profit_margin: profit_margin(net_profit, total_revenue),
            monthly_breakdown,
        })
    }

    /// Dashboard overview: the current calendar month (through `today`)
    /// against the previous calendar month, plus all-time outstanding.
    pub async fn dashboard_overview(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> DbResult<DashboardOverview> {
        let this_month = month_start(today);
        let last_month = prev_month(today);

        let month_revenue = self.revenue_half_open(owner_id, this_month, next_month(this_month)).await?;
        let month_expenses = self.expenses_half_open(owner_id, this_month, next_month(this_month)).await?;
        let prev_revenue = self.revenue_half_open(owner_id, last_month, this_month).await?;
        let prev_expenses = self.expenses_half_open(owner_id, last_month, this_month).await?;

        let (outstanding_amount, outstanding_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cents), 0), COUNT(*)
            FROM invoices
            WHERE owner_id = ?1 AND status IN ('sent', 'overdue')
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardOverview {
            month_revenue,
            month_expenses,
            month_profit: month_revenue - month_expenses,
            revenue_growth: growth_percent(month_revenue, prev_revenue),
            expense_growth: growth_percent(month_expenses, prev_expenses),
            outstanding_amount: Money::from_cents(outstanding_amount),
            outstanding_count,
        })
    }

    /// Counts and rates for the dashboard's stat tiles.
    pub async fn quick_stats(&self, owner_id: &str) -> DbResult<QuickStats> {
        let (total, draft, sent, paid, overdue): (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'draft' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'sent' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'paid' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'overdue' THEN 1 ELSE 0 END), 0)
            FROM invoices
            WHERE owner_id = ?1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let pending_expenses: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM expenses WHERE owner_id = ?1 AND status = 'pending'",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let active_employees: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE owner_id = ?1 AND status = 'active'",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(QuickStats {
            total_invoices: total,
            draft_invoices: draft,
            sent_invoices: sent,
            paid_invoices: paid,
            overdue_invoices: overdue,
            payment_rate: payment_rate(paid, total),
            pending_expenses,
            active_employees,
        })
    }

    /// Expense totals grouped by category over an inclusive range,
    /// largest first.
    pub async fn expenses_by_category(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<CategoryTotal>> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT category, COALESCE(SUM(amount_cents), 0), COUNT(*)
            FROM expenses
            WHERE owner_id = ?1 AND expense_date >= ?2 AND expense_date <= ?3
            GROUP BY category
            ORDER BY SUM(amount_cents) DESC
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, total, count)| CategoryTotal {
                category,
                total: Money::from_cents(total),
                count,
            })
            .collect())
    }

    /// Payroll totals grouped by employee over an inclusive range
    /// (by pay date), largest gross first.
    pub async fn payroll_by_employee(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<EmployeePayrollTotal>> {
        let rows: Vec<(String, String, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                e.employee_id,
                e.first_name || ' ' || e.last_name,
                COALESCE(SUM(p.gross_cents), 0),
                COALESCE(SUM(p.net_cents), 0),
                COUNT(*)
            FROM payroll_records p
            JOIN employees e ON e.id = p.employee_id
            WHERE e.owner_id = ?1 AND p.pay_date >= ?2 AND p.pay_date <= ?3
            GROUP BY e.id
            ORDER BY SUM(p.gross_cents) DESC
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(employee_id, employee_name, gross, net, record_count)| EmployeePayrollTotal {
                    employee_id,
                    employee_name,
                    gross: Money::from_cents(gross),
                    net: Money::from_cents(net),
                    record_count,
                },
            )
            .collect())
    }

    // -------------------------------------------------------------------------
    // Sum helpers
    // -------------------------------------------------------------------------

    async fn revenue_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM invoices
            WHERE owner_id = ?1 AND status = 'paid'
              AND issue_date >= ?2 AND issue_date <= ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    async fn revenue_half_open(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM invoices
            WHERE owner_id = ?1 AND status = 'paid'
              AND issue_date >= ?2 AND issue_date < ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    async fn expenses_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM expenses
            WHERE owner_id = ?1 AND expense_date >= ?2 AND expense_date <= ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    async fn expenses_half_open(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM expenses
            WHERE owner_id = ?1 AND expense_date >= ?2 AND expense_date < ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    async fn payroll_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(p.gross_cents), 0)
            FROM payroll_records p
            JOIN employees e ON e.id = p.employee_id
            WHERE e.owner_id = ?1 AND p.pay_date >= ?2 AND p.pay_date <= ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::expense::NewExpense;
    use crate::repository::invoice::{NewInvoice, NewInvoiceItem, NewPayment};
    use tally_core::{InvoiceStatus, TaxRate};

    const OWNER: &str = "owner-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    async fn seed_paid_invoice(db: &Database, issue: NaiveDate, cents: i64) {
        let repo = db.invoices();
        let invoice = repo
            .create(
                OWNER,
                NewInvoice {
                    client_name: "Client".to_string(),
                    client_email: None,
                    client_address: None,
                    issue_date: issue,
                    due_date: issue + chrono::Duration::days(30),
                    tax_rate: TaxRate::zero(),
                    notes: None,
                    items: vec![NewInvoiceItem {
                        description: "Work".to_string(),
                        quantity: 1.0,
                        unit_price: Money::from_cents(cents),
                    }],
                },
            )
            .await
            .unwrap();
        repo.send(OWNER, &invoice.id).await.unwrap();
        repo.add_payment(
            &invoice.id,
            NewPayment {
                amount: Money::from_cents(cents),
                payment_date: issue,
                method: None,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    }

    async fn seed_expense(db: &Database, date: NaiveDate, category: &str, cents: i64) {
        db.expenses()
            .create(
                OWNER,
                NewExpense {
                    category: category.to_string(),
                    description: "Expense".to_string(),
                    amount: Money::from_cents(cents),
                    expense_date: date,
                    vendor: None,
                    receipt_url: None,
                    payment_method: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_range_is_all_zeros() {
        let db = test_db().await;
        let summary = db
            .reports()
            .financial_summary(OWNER, d(1, 1), d(3, 31))
            .await
            .unwrap();

        assert!(summary.total_revenue.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.net_profit.is_zero());
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.outstanding_count, 0);
        // Three empty month buckets, not an empty series
        assert_eq!(summary.monthly_breakdown.len(), 3);
        assert!(summary.monthly_breakdown[0].revenue.is_zero());
    }

    #[tokio::test]
    async fn test_summary_sums_and_buckets() {
        let db = test_db().await;
        seed_paid_invoice(&db, d(1, 10), 100_000).await;
        seed_paid_invoice(&db, d(2, 10), 50_000).await;
        seed_expense(&db, d(1, 15), "Rent", 30_000).await;

        let summary = db
            .reports()
            .financial_summary(OWNER, d(1, 1), d(2, 28))
            .await
            .unwrap();

        assert_eq!(summary.total_revenue.cents(), 150_000);
        assert_eq!(summary.total_expenses.cents(), 30_000);
        assert_eq!(summary.net_profit.cents(), 120_000);
        assert!((summary.profit_margin - 80.0).abs() < 1e-9);

        assert_eq!(summary.monthly_breakdown.len(), 2);
        assert_eq!(summary.monthly_breakdown[0].month, "2026-01");
        assert_eq!(summary.monthly_breakdown[0].revenue.cents(), 100_000);
        assert_eq!(summary.monthly_breakdown[0].profit.cents(), 70_000);
        assert_eq!(summary.monthly_breakdown[1].revenue.cents(), 50_000);
    }

    #[tokio::test]
    async fn test_draft_invoices_are_not_revenue() {
        let db = test_db().await;
        db.invoices()
            .create(
                OWNER,
                NewInvoice {
                    client_name: "Client".to_string(),
                    client_email: None,
                    client_address: None,
                    issue_date: d(1, 10),
                    due_date: d(2, 10),
                    tax_rate: TaxRate::zero(),
                    notes: None,
                    items: vec![NewInvoiceItem {
                        description: "Work".to_string(),
                        quantity: 1.0,
                        unit_price: Money::from_cents(99_000),
                    }],
                },
            )
            .await
            .unwrap();

        let summary = db
            .reports()
            .financial_summary(OWNER, d(1, 1), d(1, 31))
            .await
            .unwrap();
        assert!(summary.total_revenue.is_zero());
    }

    #[tokio::test]
    async fn test_dashboard_growth_guarded_when_no_history() {
        let db = test_db().await;
        seed_paid_invoice(&db, d(6, 5), 80_000).await;

        let overview = db
            .reports()
            .dashboard_overview(OWNER, d(6, 20))
            .await
            .unwrap();

        assert_eq!(overview.month_revenue.cents(), 80_000);
        // No May revenue: growth must be 0, not infinity
        assert_eq!(overview.revenue_growth, 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_growth_against_previous_month() {
        let db = test_db().await;
        seed_paid_invoice(&db, d(5, 10), 100_000).await;
        seed_paid_invoice(&db, d(6, 5), 150_000).await;

        let overview = db
            .reports()
            .dashboard_overview(OWNER, d(6, 20))
            .await
            .unwrap();

        assert!((overview.revenue_growth - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_quick_stats_counts_and_rate() {
        let db = test_db().await;
        seed_paid_invoice(&db, d(1, 10), 10_000).await;
        seed_paid_invoice(&db, d(1, 11), 10_000).await;
        db.invoices()
            .create(
                OWNER,
                NewInvoice {
                    client_name: "Client".to_string(),
                    client_email: None,
                    client_address: None,
                    issue_date: d(1, 12),
                    due_date: d(2, 12),
                    tax_rate: TaxRate::zero(),
                    notes: None,
                    items: vec![],
                },
            )
            .await
            .unwrap();
        seed_expense(&db, d(1, 15), "Rent", 5_000).await;

        let stats = db.reports().quick_stats(OWNER).await.unwrap();

        assert_eq!(stats.total_invoices, 3);
        assert_eq!(stats.paid_invoices, 2);
        assert_eq!(stats.draft_invoices, 1);
        assert!((stats.payment_rate - 66.666).abs() < 0.01);
        assert_eq!(stats.pending_expenses, 1);
        assert_eq!(stats.active_employees, 0);
    }

    #[tokio::test]
    async fn test_expenses_by_category_ordering() {
        let db = test_db().await;
        seed_expense(&db, d(1, 5), "Rent", 90_000).await;
        seed_expense(&db, d(1, 6), "Supplies", 10_000).await;
        seed_expense(&db, d(1, 7), "Supplies", 15_000).await;

        let totals = db
            .reports()
            .expenses_by_category(OWNER, d(1, 1), d(1, 31))
            .await
            .unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Rent");
        assert_eq!(totals[1].total.cents(), 25_000);
        assert_eq!(totals[1].count, 2);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let db = test_db().await;
        seed_paid_invoice(&db, d(1, 10), 100_000).await;

        let summary = db
            .reports()
            .financial_summary("someone-else", d(1, 1), d(1, 31))
            .await
            .unwrap();
        assert!(summary.total_revenue.is_zero());

        let invoices = db
            .invoices()
            .list(OWNER, Some(InvoiceStatus::Paid), 10, 0)
            .await
            .unwrap();
        assert_eq!(invoices.len(), 1);
    }
}

//! # Seed Data Generator
//!
//! Populates the database with demo accounting data for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! ## Generated Data
//! One demo owner with:
//! - Expense categories and a few months of expenses
//! - A handful of clients with invoices across draft/sent/paid
//! - Hourly and salaried employees with two weeks of time entries
//! - One batch payroll run over those entries

use std::env;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use tally_core::{Money, PaymentMethod, TaxRate};
use tally_db::{
    Database, DbConfig, NewEmployee, NewExpense, NewInvoice, NewInvoiceItem, NewPayment,
    NewTimeEntry,
};

const OWNER_ID: &str = "demo-owner";

const CLIENTS: &[&str] = &[
    "Acme Corp",
    "Globex LLC",
    "Initech",
    "Stark Industries",
    "Wayne Enterprises",
    "Hooli",
];

const SERVICES: &[(&str, i64)] = &[
    ("Consulting (hourly)", 15_000),
    ("Website maintenance", 45_000),
    ("Monthly retainer", 120_000),
    ("On-site training", 80_000),
];

const EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("Rent", "#d9534f"),
    ("Utilities", "#f0ad4e"),
    ("Office Supplies", "#5bc0de"),
    ("Software", "#5cb85c"),
    ("Travel", "#9b59b6"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tally_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.invoices().list(OWNER_ID, None, 1, 0).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has demo data, skipping.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Utc::now().date_naive();

    // Expense categories + three months of expenses
    for (name, color) in EXPENSE_CATEGORIES {
        db.expenses().create_category(name, None, Some(color)).await?;
    }
    let mut expense_count = 0;
    for months_back in 0..3 {
        let date = today - Duration::days(30 * months_back);
        for (idx, (category, _)) in EXPENSE_CATEGORIES.iter().enumerate() {
            db.expenses()
                .create(
                    OWNER_ID,
                    NewExpense {
                        category: category.to_string(),
                        description: format!("{} - {}", category, date.format("%B")),
                        amount: Money::from_cents(10_000 + (idx as i64) * 7_500),
                        expense_date: date - Duration::days(idx as i64 * 3),
                        vendor: None,
                        receipt_url: None,
                        payment_method: Some(PaymentMethod::CreditCard),
                        notes: None,
                    },
                )
                .await?;
            expense_count += 1;
        }
    }
    println!("✓ Created {} expenses", expense_count);

    // Invoices in mixed lifecycle states
    let mut invoice_count = 0;
    for (idx, client) in CLIENTS.iter().enumerate() {
        let issue_date = today - Duration::days(15 * idx as i64);
        let (description, price) = SERVICES[idx % SERVICES.len()];

        let invoice = db
            .invoices()
            .create(
                OWNER_ID,
                NewInvoice {
                    client_name: client.to_string(),
                    client_email: Some(format!(
                        "billing@{}.example",
                        client.to_lowercase().replace(' ', "")
                    )),
                    client_address: None,
                    issue_date,
                    due_date: issue_date + Duration::days(30),
                    tax_rate: TaxRate::from_bps(825),
                    notes: None,
                    items: vec![
                        NewInvoiceItem {
                            description: description.to_string(),
                            quantity: 1.0 + idx as f64,
                            unit_price: Money::from_cents(price),
                        },
                        NewInvoiceItem {
                            description: "Expenses passthrough".to_string(),
                            quantity: 1.0,
                            unit_price: Money::from_cents(2_500),
                        },
                    ],
                },
            )
            .await?;
        invoice_count += 1;

        // Leave every third invoice in draft; pay every other sent one
        if idx % 3 != 0 {
            db.invoices().send(OWNER_ID, &invoice.id).await?;
            if idx % 2 == 0 {
                db.invoices()
                    .add_payment(
                        &invoice.id,
                        NewPayment {
                            amount: invoice.total(),
                            payment_date: issue_date + Duration::days(10),
                            method: Some(PaymentMethod::BankTransfer),
                            reference: None,
                            notes: None,
                        },
                    )
                    .await?;
            }
        }
    }
    db.invoices().mark_overdue(OWNER_ID, today).await?;
    println!("✓ Created {} invoices", invoice_count);

    // Employees: two hourly, one salaried
    let staff = [
        ("Ada", "Lovelace", Some(Money::from_cents(3_500)), Money::zero()),
        ("Charles", "Babbage", Some(Money::from_cents(2_800)), Money::zero()),
        ("Grace", "Hopper", None, Money::from_cents(7_800_000)),
    ];
    let mut employee_ids = Vec::new();
    for (first, last, hourly_rate, salary) in staff {
        let employee = db
            .employees()
            .create(
                OWNER_ID,
                NewEmployee {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: format!("{}@tally.example", first.to_lowercase()),
                    phone: None,
                    address: None,
                    hire_date: today - Duration::days(400),
                    position: Some("Engineer".to_string()),
                    department: Some("Services".to_string()),
                    salary,
                    hourly_rate,
                },
            )
            .await?;
        employee_ids.push(employee.id);
    }
    println!("✓ Created {} employees", employee_ids.len());

    // Two weeks of weekday time entries
    let period_end = today;
    let period_start = period_end - Duration::days(14);
    let mut entry_count = 0;
    for employee_id in &employee_ids {
        let mut day = period_start;
        while day <= period_end {
            if day.weekday().number_from_monday() <= 5 {
                db.time_entries()
                    .create(NewTimeEntry {
                        employee_id: employee_id.clone(),
                        date: day,
                        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                        end_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
                        notes: None,
                    })
                    .await?;
                entry_count += 1;
            }
            day += Duration::days(1);
        }
    }
    println!("✓ Created {} time entries", entry_count);

    // Batch payroll over the seeded entries
    let outcome = db
        .payroll()
        .run_batch(OWNER_ID, period_start, period_end, period_end + Duration::days(5))
        .await?;
    println!(
        "✓ Batch payroll: {} records created, {} skipped",
        outcome.created.len(),
        outcome.skipped
    );

    // Quick sanity read-back
    let stats = db.reports().quick_stats(OWNER_ID).await?;
    println!();
    println!(
        "Dashboard: {} invoices ({} paid), payment rate {:.1}%",
        stats.total_invoices, stats.paid_invoices, stats.payment_rate
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

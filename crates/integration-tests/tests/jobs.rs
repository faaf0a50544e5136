//! Scheduled jobs run as full flows against seeded stores.
//!
//! Output goes to a `MemorySink` so every line the job writes can be
//! asserted verbatim.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use copperline_core::{Email, Price};
use copperline_crm::api::CrmApi;
use copperline_crm::db::{CustomerRepository, OrderRepository, ProductRepository};
use copperline_crm::filters::ProductFilter;
use copperline_crm::jobs::{CleanupJob, HeartbeatJob, Job, LowStockJob, RemindersJob, ReportJob};
use copperline_crm::seed::seed_all;
use copperline_crm::sink::{FileSink, LogSink, MemorySink};
use copperline_integration_tests::memory_store;

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("Invalid test timestamp")
}

fn capture() -> (Arc<MemorySink>, Arc<dyn LogSink>) {
    let sink = Arc::new(MemorySink::new());
    let as_log_sink = Arc::clone(&sink) as Arc<dyn LogSink>;
    (sink, as_log_sink)
}

#[tokio::test]
async fn test_report_reflects_seeded_store() {
    let pool = memory_store().await;
    seed_all(&pool).await.expect("Seeding failed");

    let (sink, log_sink) = capture();
    ReportJob::new(pool, log_sink)
        .run(at(2026, 8, 24, 6))
        .await
        .expect("Report job failed");

    assert_eq!(
        sink.lines(),
        ["2026-08-24 06:00:00 - Report: 5 customers, 4 orders, $1659.93 revenue"]
    );
}

#[tokio::test]
async fn test_report_aggregates_counts_and_revenue() {
    let pool = memory_store().await;
    let now = at(2026, 8, 24, 6);

    let customers = CustomerRepository::new(&pool);
    let alice = customers
        .create("Alice", &"alice@example.com".parse::<Email>().expect("Invalid email"), None, now)
        .await
        .expect("Failed to insert customer");
    let bob = customers
        .create("Bob", &"bob@example.com".parse::<Email>().expect("Invalid email"), None, now)
        .await
        .expect("Failed to insert customer");
    customers
        .create("Carol", &"carol@example.com".parse::<Email>().expect("Invalid email"), None, now)
        .await
        .expect("Failed to insert customer");

    let products = ProductRepository::new(&pool);
    let widget = products
        .create(
            "Widget",
            Price::parse("100.00".parse().expect("Failed to parse decimal literal"))
                .expect("Invalid price literal"),
            10,
            now,
        )
        .await
        .expect("Failed to insert product");
    let gadget = products
        .create(
            "Gadget",
            Price::parse("150.00".parse().expect("Failed to parse decimal literal"))
                .expect("Invalid price literal"),
            10,
            now,
        )
        .await
        .expect("Failed to insert product");

    let orders = OrderRepository::new(&pool);
    orders
        .create(alice.id, &[widget.id], 10000, now - chrono::Duration::days(1))
        .await
        .expect("Failed to insert order");
    orders
        .create(bob.id, &[gadget.id], 15000, now - chrono::Duration::days(2))
        .await
        .expect("Failed to insert order");

    let (sink, log_sink) = capture();
    ReportJob::new(pool, log_sink)
        .run(now)
        .await
        .expect("Report job failed");

    // Carol has no orders but still counts as a customer.
    assert_eq!(
        sink.lines(),
        ["2026-08-24 06:00:00 - Report: 3 customers, 2 orders, $250.00 revenue"]
    );
}

#[tokio::test]
async fn test_cleanup_then_report_flow() {
    let pool = memory_store().await;
    let now = at(2026, 8, 23, 2);
    let long_ago = now - chrono::Duration::days(500);

    let customers = CustomerRepository::new(&pool);
    let ghost = customers
        .create("Ghost", &"ghost@example.com".parse::<Email>().expect("Invalid email"), None, long_ago)
        .await
        .expect("Failed to insert customer");
    let active = customers
        .create("Active", &"active@example.com".parse::<Email>().expect("Invalid email"), None, long_ago)
        .await
        .expect("Failed to insert customer");

    let widget = ProductRepository::new(&pool)
        .create(
            "Widget",
            Price::parse("19.99".parse().expect("Failed to parse decimal literal"))
                .expect("Invalid price literal"),
            10,
            long_ago,
        )
        .await
        .expect("Failed to insert product");
    let orders = OrderRepository::new(&pool);
    // An order outside the activity window does not keep its customer alive.
    orders
        .create(ghost.id, &[widget.id], 2599, now - chrono::Duration::days(400))
        .await
        .expect("Failed to insert order");
    orders
        .create(active.id, &[widget.id], 1999, now - chrono::Duration::days(10))
        .await
        .expect("Failed to insert order");

    let (cleanup_sink, cleanup_log) = capture();
    CleanupJob::new(pool.clone(), cleanup_log)
        .run(now)
        .await
        .expect("Cleanup job failed");
    assert_eq!(
        cleanup_sink.lines(),
        ["[2026-08-23 02:00:00] Deleted 1 inactive customers"]
    );

    let (report_sink, report_log) = capture();
    ReportJob::new(pool, report_log)
        .run(at(2026, 8, 24, 6))
        .await
        .expect("Report job failed");
    assert_eq!(
        report_sink.lines(),
        ["2026-08-24 06:00:00 - Report: 1 customers, 1 orders, $19.99 revenue"]
    );
}

#[tokio::test]
async fn test_restock_clears_low_stock_backlog() {
    let pool = memory_store().await;
    seed_all(&pool).await.expect("Seeding failed");

    let (sink, log_sink) = capture();
    LowStockJob::new(CrmApi::new(pool.clone()), log_sink)
        .run(at(2026, 8, 22, 12))
        .await
        .expect("Low-stock job failed");

    assert_eq!(
        sink.lines(),
        [
            "[2026-08-22 12:00:00] Restocked 1 low-stock products",
            "[2026-08-22 12:00:00] Product: Headphones, New Stock: 15",
        ]
    );

    let still_low = CrmApi::new(pool)
        .all_products(&ProductFilter {
            low_stock: Some(true),
            ..ProductFilter::default()
        })
        .await
        .expect("Query failed");
    assert!(still_low.is_empty());
}

#[tokio::test]
async fn test_reminders_cover_only_past_week() {
    let pool = memory_store().await;
    let now = at(2026, 8, 22, 8);

    let alice = CustomerRepository::new(&pool)
        .create("Alice", &"alice@example.com".parse::<Email>().expect("Invalid email"), None, now)
        .await
        .expect("Failed to insert customer");
    let widget = ProductRepository::new(&pool)
        .create(
            "Widget",
            Price::parse("19.99".parse().expect("Failed to parse decimal literal"))
                .expect("Invalid price literal"),
            10,
            now,
        )
        .await
        .expect("Failed to insert product");

    let orders = OrderRepository::new(&pool);
    let recent = orders
        .create(alice.id, &[widget.id], 1999, at(2026, 8, 20, 12))
        .await
        .expect("Failed to insert order");
    orders
        .create(alice.id, &[widget.id], 1999, at(2026, 7, 1, 12))
        .await
        .expect("Failed to insert order");

    let (sink, log_sink) = capture();
    RemindersJob::new(pool, log_sink)
        .run(now)
        .await
        .expect("Reminders job failed");

    assert_eq!(
        sink.lines(),
        [
            "[2026-08-22 08:00:00] Processing 1 order(s)".to_string(),
            format!(
                "[2026-08-22 08:00:00] Order ID: {}, Customer Email: alice@example.com, \
                 Order Date: 2026-08-20T12:00:00+00:00",
                recent.id
            ),
        ]
    );
}

#[tokio::test]
async fn test_heartbeat_records_alive_and_responsive() {
    let pool = memory_store().await;

    let (sink, log_sink) = capture();
    HeartbeatJob::new(CrmApi::new(pool), log_sink)
        .run(at(2026, 8, 22, 14))
        .await
        .expect("Heartbeat job failed");

    assert_eq!(
        sink.lines(),
        [
            "22/08/2026-14:00:00 CRM is alive",
            "22/08/2026-14:00:00 query endpoint responsive",
        ]
    );
}

#[tokio::test]
async fn test_report_appends_to_log_file() {
    let pool = memory_store().await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("crm_report_log.txt");
    let job = ReportJob::new(pool, Arc::new(FileSink::new(path.clone())));

    job.run(at(2026, 8, 24, 6)).await.expect("Report job failed");
    job.run(at(2026, 8, 31, 6)).await.expect("Report job failed");

    let contents = std::fs::read_to_string(&path).expect("Failed to read log file");
    assert_eq!(
        contents,
        "2026-08-24 06:00:00 - Report: 0 customers, 0 orders, $0.00 revenue\n\
         2026-08-31 06:00:00 - Report: 0 customers, 0 orders, $0.00 revenue\n"
    );
}

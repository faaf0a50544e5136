//! Sample data seeding against stores in various starting states.

use copperline_crm::api::CrmApi;
use copperline_crm::filters::{CustomerFilter, OrderFilter, ProductFilter};
use copperline_crm::models::CreateCustomerInput;
use copperline_crm::seed::{SeedSummary, seed_all};
use copperline_integration_tests::memory_store;

#[tokio::test]
async fn test_seed_skips_customers_that_already_exist() {
    let pool = memory_store().await;
    let api = CrmApi::new(pool.clone());

    api.create_customer(CreateCustomerInput {
        name: "Robert".to_string(),
        email: "bob@example.com".to_string(),
        phone: None,
    })
    .await
    .expect("Failed to create customer");

    let summary = seed_all(&pool).await.expect("Seeding failed");
    assert_eq!(summary.customers_created, 4);

    let customers = api
        .all_customers(&CustomerFilter::default())
        .await
        .expect("Query failed");
    assert_eq!(customers.len(), 5);

    // The pre-existing record is untouched, not overwritten.
    let bob = api
        .all_customers(&CustomerFilter {
            email_icontains: Some("bob@example.com".to_string()),
            ..CustomerFilter::default()
        })
        .await
        .expect("Query failed");
    assert_eq!(bob.first().map(|c| c.name.as_str()), Some("Robert"));
}

#[tokio::test]
async fn test_seeded_orders_are_queryable_through_filters() {
    let pool = memory_store().await;
    seed_all(&pool).await.expect("Seeding failed");

    let api = CrmApi::new(pool);

    let alice_orders = api
        .all_orders(&OrderFilter {
            customer_name_icontains: Some("alice".to_string()),
            ..OrderFilter::default()
        })
        .await
        .expect("Query failed");
    assert_eq!(alice_orders.len(), 2);

    let laptop_orders = api
        .all_orders(&OrderFilter {
            product_name_icontains: Some("laptop".to_string()),
            ..OrderFilter::default()
        })
        .await
        .expect("Query failed");
    assert_eq!(laptop_orders.len(), 1);
    assert_eq!(
        laptop_orders.first().map(|o| o.total_amount.to_string()),
        Some("1029.98".to_string())
    );
}

#[tokio::test]
async fn test_reseeding_changes_nothing() {
    let pool = memory_store().await;

    let first = seed_all(&pool).await.expect("Seeding failed");
    assert_eq!(
        first,
        SeedSummary {
            customers_created: 5,
            products_created: 7,
            orders_created: 4,
        }
    );

    let second = seed_all(&pool).await.expect("Reseeding failed");
    assert_eq!(second, SeedSummary::default());

    let api = CrmApi::new(pool);
    let products = api
        .all_products(&ProductFilter::default())
        .await
        .expect("Query failed");
    assert_eq!(products.len(), 7);
    let orders = api
        .all_orders(&OrderFilter::default())
        .await
        .expect("Query failed");
    assert_eq!(orders.len(), 4);
}

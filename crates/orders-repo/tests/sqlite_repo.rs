#![cfg(feature = "sqlite")]

use orders_repo::sqlite::SqliteRepo;
use orders_types::domain::customer::Customer;
use orders_types::domain::order::NewOrder;
use orders_types::domain::product::Product;
use orders_types::ports::{CustomerRepository, OrderRepository, ProductRepository, RepoError};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

fn temp_db_url() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push(format!("orders-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    (dir, url)
}

async fn seeded(url: &str) -> SqliteRepo {
    let repo = SqliteRepo::new(url).await.unwrap();
    repo.add_customer(Customer::new(2, "Jane Smith".into()).unwrap())
        .await
        .unwrap();
    repo.add_product(
        Product::new(1, "Product 1".into(), Decimal::from_str("19.99").unwrap()).unwrap(),
    )
    .await
    .unwrap();
    repo.add_product(Product::new(2, "Product 2".into(), Decimal::new(200, 0)).unwrap())
        .await
        .unwrap();
    repo
}

#[tokio::test]
async fn sqlite_repo_create_and_get_order() {
    let (_dir, url) = temp_db_url();
    let repo = seeded(&url).await;

    let p1 = repo.get_product(1).await.unwrap().unwrap();
    let p2 = repo.get_product(2).await.unwrap().unwrap();
    assert_eq!(p1.price, Decimal::from_str("19.99").unwrap());

    let created = repo
        .create_order(NewOrder::new(2, &[p2, p1.clone(), p1]).unwrap())
        .await
        .unwrap();
    assert_eq!(created.total_price, Decimal::from_str("239.98").unwrap());

    let fetched = repo.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.customer_id, 2);
    assert_eq!(fetched.total_price, created.total_price);
    let ids: Vec<_> = fetched.products.iter().map(|l| l.product_id).collect();
    assert_eq!(ids, vec![2, 1, 1]);
}

#[tokio::test]
async fn sqlite_repo_failed_create_leaves_nothing_behind() {
    let (_dir, url) = temp_db_url();
    let repo = seeded(&url).await;
    let p1 = repo.get_product(1).await.unwrap().unwrap();
    let ghost = Product {
        id: 77,
        name: "Ghost".into(),
        price: Decimal::ONE,
    };

    // Link to a product that does not exist violates the foreign key mid-transaction.
    let res = repo
        .create_order(NewOrder::new(2, &[p1.clone(), ghost]).unwrap())
        .await;
    assert!(matches!(res, Err(RepoError::DbError(_))));

    let next = repo
        .create_order(NewOrder::new(2, &[p1]).unwrap())
        .await
        .unwrap();
    // The failed attempt took id 1 inside its transaction; rollback hands it out again.
    assert_eq!(next.id, 1);
    let stored = repo.get_order(next.id).await.unwrap().unwrap();
    let ids: Vec<_> = stored.products.iter().map(|l| l.product_id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn sqlite_repo_handles_missing_rows_and_conflicts() {
    let (_dir, url) = temp_db_url();
    let repo = seeded(&url).await;

    assert!(repo.get_order(9999).await.unwrap().is_none());
    assert!(repo.get_customer(999).await.unwrap().is_none());

    let found = repo.get_products(&[1, 42, 1]).await.unwrap();
    assert_eq!(found.len(), 1);

    let c = repo.find_customer_by_name("Jane Smith").await.unwrap();
    assert_eq!(c.map(|c| c.id), Some(2));

    let dup = repo
        .add_product(Product::new(2, "Again".into(), Decimal::ONE).unwrap())
        .await;
    assert!(matches!(dup, Err(RepoError::Conflict(_))));
}

#[tokio::test]
async fn sqlite_repo_resolves_long_id_lists() {
    let (_dir, url) = temp_db_url();
    let repo = seeded(&url).await;

    let repeated = vec![1; 40_000];
    let found = repo.get_products(&repeated).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    // Many distinct ids, only two of which exist, span several lookup batches.
    let mut wide: Vec<i64> = (1000..3000).collect();
    wide.extend([2, 1]);
    let mut found: Vec<_> = repo
        .get_products(&wide)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    found.sort();
    assert_eq!(found, vec![1, 2]);

    let p2 = repo.get_product(2).await.unwrap().unwrap();
    let order = repo
        .create_order(NewOrder::new(2, &vec![p2; 2_000]).unwrap())
        .await
        .unwrap();
    assert_eq!(order.total_price, Decimal::new(400_000, 0));
    let stored = repo.get_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored.products.len(), 2_000);
}

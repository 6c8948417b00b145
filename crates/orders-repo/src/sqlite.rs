use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{NewOrder, Order, OrderId, OrderProduct};
use orders_types::domain::product::{Product, ProductId};
use orders_types::ports::{CustomerRepository, OrderRepository, ProductRepository, RepoError};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Executor, FromRow, SqlitePool};
use std::collections::BTreeSet;
use std::str::FromStr;

// Stays under SQLITE_MAX_VARIABLE_NUMBER (999 before SQLite 3.32).
const MAX_BIND_PARAMS: usize = 500;

pub struct SqliteRepo {
    pool: SqlitePool,
}

fn db_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::DbError(e.to_string())
}

fn parse_decimal(s: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(s).map_err(db_err)
}

#[derive(FromRow)]
struct DbCustomer {
    id: i64,
    name: String,
}

impl From<DbCustomer> for Customer {
    fn from(r: DbCustomer) -> Self {
        Customer {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(FromRow)]
struct DbProduct {
    id: i64,
    name: String,
    price: String,
}

impl DbProduct {
    fn into_product(self) -> Result<Product, RepoError> {
        Ok(Product {
            id: self.id,
            name: self.name,
            price: parse_decimal(&self.price)?,
        })
    }
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    customer_id: i64,
    total_price: String,
    created_at: String,
}

impl DbOrder {
    fn into_order(self, product_ids: Vec<ProductId>) -> Result<Order, RepoError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(db_err)?
            .with_timezone(&Utc);
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            total_price: parse_decimal(&self.total_price)?,
            products: product_ids
                .into_iter()
                .map(|product_id| OrderProduct {
                    order_id: self.id,
                    product_id,
                })
                .collect(),
            created_at,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        pool.execute(ddl).await?;

        tracing::debug!(database_url, "sqlite repository ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl CustomerRepository for SqliteRepo {
    async fn add_customer(&self, customer: Customer) -> Result<Customer, RepoError> {
        let res = sqlx::query("INSERT INTO customers (id, name) VALUES (?, ?) ON CONFLICT (id) DO NOTHING")
            .bind(customer.id)
            .bind(&customer.name)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(RepoError::Conflict(format!(
                "customer {} already exists",
                customer.id
            )));
        }
        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> = sqlx::query_as("SELECT id, name FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(Customer::from))
    }

    async fn find_customer_by_name(&self, name: &str) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> =
            sqlx::query_as("SELECT id, name FROM customers WHERE name = ? ORDER BY id LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl ProductRepository for SqliteRepo {
    async fn add_product(&self, product: Product) -> Result<Product, RepoError> {
        let res = sqlx::query(
            "INSERT INTO products (id, name, price) VALUES (?, ?, ?) ON CONFLICT (id) DO NOTHING",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(RepoError::Conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        let row: Option<DbProduct> =
            sqlx::query_as("SELECT id, name, price FROM products WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.map(|r| r.into_product()).transpose()
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, RepoError> {
        let row: Option<DbProduct> = sqlx::query_as(
            "SELECT id, name, price FROM products WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(|r| r.into_product()).transpose()
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepoError> {
        let distinct: BTreeSet<ProductId> = ids.iter().copied().collect();
        let distinct: Vec<ProductId> = distinct.into_iter().collect();
        let mut products = Vec::with_capacity(distinct.len());
        for chunk in distinct.chunks(MAX_BIND_PARAMS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("SELECT id, name, price FROM products WHERE id IN ({placeholders})");
            let mut query = sqlx::query_as::<_, DbProduct>(&sql);
            for id in chunk {
                query = query.bind(*id);
            }
            let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
            for row in rows {
                products.push(row.into_product()?);
            }
        }
        Ok(products)
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let res = sqlx::query(
            "INSERT INTO orders (customer_id, total_price, created_at) VALUES (?, ?, ?)",
        )
        .bind(order.customer_id)
        .bind(order.total_price.to_string())
        .bind(order.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        let id: OrderId = res.last_insert_rowid();

        for (position, product_id) in order.product_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_products (order_id, position, product_id) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(position as i64)
            .bind(*product_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        // Dropping `tx` on any error above rolls everything back.
        tx.commit().await.map_err(db_err)?;
        Ok(order.into_order(id))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(
            "SELECT id, customer_id, total_price, created_at FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let product_ids: Vec<ProductId> = sqlx::query_scalar(
            "SELECT product_id FROM order_products WHERE order_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        row.into_order(product_ids).map(Some)
    }
}

#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use async_trait::async_trait;
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{NewOrder, Order, OrderId};
use orders_types::domain::product::{Product, ProductId};
use orders_types::ports::{CustomerRepository, OrderRepository, ProductRepository, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub const DEFAULT_DATABASE_URL: &str = "sqlite://orders.db";

/// Store selected at startup from the enabled features and the configured url.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        tracing::info!("using in-memory store");
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or(DEFAULT_DATABASE_URL);
        tracing::info!(url, "using sqlite store");
        Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
    }

    // With both features, an explicit url selects sqlite; otherwise memory.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => {
                tracing::info!(url, "using sqlite store");
                Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
            }
            None => {
                tracing::info!("using in-memory store");
                Ok(Self::Memory(memory::InMemoryRepo::new()))
            }
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait]
impl CustomerRepository for Repo {
    async fn add_customer(&self, customer: Customer) -> Result<Customer, RepoError> {
        dispatch!(self, r => r.add_customer(customer).await)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        dispatch!(self, r => r.get_customer(id).await)
    }

    async fn find_customer_by_name(&self, name: &str) -> Result<Option<Customer>, RepoError> {
        dispatch!(self, r => r.find_customer_by_name(name).await)
    }
}

#[async_trait]
impl ProductRepository for Repo {
    async fn add_product(&self, product: Product) -> Result<Product, RepoError> {
        dispatch!(self, r => r.add_product(product).await)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        dispatch!(self, r => r.get_product(id).await)
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, RepoError> {
        dispatch!(self, r => r.find_product_by_name(name).await)
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepoError> {
        dispatch!(self, r => r.get_products(ids).await)
    }
}

#[async_trait]
impl OrderRepository for Repo {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        dispatch!(self, r => r.create_order(order).await)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        dispatch!(self, r => r.get_order(id).await)
    }
}

use async_trait::async_trait;

use crate::domain::order::{NewOrder, Order, OrderId};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the order row and all of its product links together, or nothing.
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError>;
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError>;
}

use async_trait::async_trait;

use super::order_repository::RepoError;
use crate::domain::product::{Product, ProductId};

#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn add_product(&self, product: Product) -> Result<Product, RepoError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError>;
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, RepoError>;
    /// Returns the distinct products among `ids` that exist, in no particular order.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepoError>;
}

use async_trait::async_trait;

use super::order_repository::RepoError;
use crate::domain::customer::{Customer, CustomerId};

#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    async fn add_customer(&self, customer: Customer) -> Result<Customer, RepoError>;
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepoError>;
    async fn find_customer_by_name(&self, name: &str) -> Result<Option<Customer>, RepoError>;
}

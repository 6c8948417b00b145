use std::collections::HashMap;

use crate::errors::AppError;
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{NewOrder, Order, OrderId};
use orders_types::domain::product::{Product, ProductId};
use orders_types::ports::OrderStore;
use rust_decimal::Decimal;

pub struct OrderService<R: OrderStore> {
    repo: R,
}

impl<R: OrderStore> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Prices and persists an order. Every id in `product_ids` becomes one link,
    /// in the given order; an id that resolves to no product fails the whole call.
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        product_ids: Vec<ProductId>,
    ) -> Result<Order, AppError> {
        let customer = match self.repo.get_customer(customer_id).await? {
            Some(c) => c,
            None => {
                tracing::warn!(customer_id, "create_order: customer not found");
                return Err(AppError::CustomerNotFound(customer_id));
            }
        };
        if product_ids.is_empty() {
            return Err(AppError::BadRequest("product_ids empty".into()));
        }

        let found: HashMap<ProductId, Product> = self
            .repo
            .get_products(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let products = product_ids
            .iter()
            .map(|id| {
                found.get(id).cloned().ok_or_else(|| {
                    tracing::warn!(product_id = id, "create_order: product not found");
                    AppError::ProductNotFound(*id)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let new_order =
            NewOrder::new(customer.id, &products).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let order = self.repo.create_order(new_order).await?;
        tracing::info!(
            order_id = order.id,
            customer_id,
            total_price = %order.total_price,
            lines = order.products.len(),
            "order created"
        );
        Ok(order)
    }

    /// A missing order is `Ok(None)`, not an error.
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, AppError> {
        Ok(self.repo.get_order(id).await?)
    }

    pub async fn add_customer(&self, id: CustomerId, name: String) -> Result<Customer, AppError> {
        let customer = Customer::new(id, name).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(self.repo.add_customer(customer).await?)
    }

    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, AppError> {
        Ok(self.repo.get_customer(id).await?)
    }

    pub async fn add_product(
        &self,
        id: ProductId,
        name: String,
        price: Decimal,
    ) -> Result<Product, AppError> {
        let product =
            Product::new(id, name, price).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(self.repo.add_product(product).await?)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, AppError> {
        Ok(self.repo.get_product(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orders_repo::memory::InMemoryRepo;
    use orders_types::ports::{CustomerRepository, ProductRepository};

    async fn seeded_service() -> (InMemoryRepo, OrderService<InMemoryRepo>) {
        let repo = InMemoryRepo::new();
        let svc = OrderService::new(repo.clone());
        svc.add_customer(1, "John Doe".into()).await.unwrap();
        svc.add_customer(2, "Jane Smith".into()).await.unwrap();
        svc.add_product(1, "Product 1".into(), Decimal::new(100, 0))
            .await
            .unwrap();
        svc.add_product(2, "Product 2".into(), Decimal::new(200, 0))
            .await
            .unwrap();
        (repo, svc)
    }

    #[tokio::test]
    async fn create_order_success() {
        let (repo, svc) = seeded_service().await;
        let customer = repo.find_customer_by_name("John Doe").await.unwrap().unwrap();
        let product = repo.find_product_by_name("Product 1").await.unwrap().unwrap();

        let order = svc.create_order(customer.id, vec![product.id]).await.unwrap();
        assert_eq!(order.total_price, product.price);
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].product_id, product.id);
        assert_eq!(order.customer_id, customer.id);

        let found = svc.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(found.id, order.id);
    }

    #[tokio::test]
    async fn get_order_by_id_returns_order() {
        let (repo, svc) = seeded_service().await;
        let customer = repo.find_customer_by_name("Jane Smith").await.unwrap().unwrap();
        let product = repo.find_product_by_name("Product 2").await.unwrap().unwrap();
        let order = svc.create_order(customer.id, vec![product.id]).await.unwrap();
        assert_eq!(order.total_price, Decimal::new(200, 0));

        let fetched = svc.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, order.id);
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn create_order_customer_not_found() {
        let (repo, svc) = seeded_service().await;
        let err = svc.create_order(999, vec![1]).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(999)));
        assert_eq!(err.to_string(), "Customer not found");
        assert!(repo.orders.is_empty());
    }

    #[tokio::test]
    async fn get_order_by_id_order_not_found_returns_none() {
        let (_repo, svc) = seeded_service().await;
        assert!(svc.get_order(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_product_fails_whole_order() {
        let (repo, svc) = seeded_service().await;
        let err = svc.create_order(1, vec![1, 42]).await.unwrap_err();
        assert!(matches!(err, AppError::ProductNotFound(42)));
        assert!(repo.orders.is_empty());
    }

    #[tokio::test]
    async fn duplicates_are_linked_and_priced_each_time() {
        let (_repo, svc) = seeded_service().await;
        let order = svc.create_order(1, vec![2, 1, 2]).await.unwrap();
        assert_eq!(order.total_price, Decimal::new(500, 0));
        let ids: Vec<_> = order.products.iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![2, 1, 2]);
    }

    #[tokio::test]
    async fn overflowing_total_is_bad_request() {
        let (repo, svc) = seeded_service().await;
        svc.add_product(3, "Big".into(), Decimal::MAX).await.unwrap();
        let err = svc.create_order(1, vec![3, 3]).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(repo.orders.is_empty());
    }

    #[tokio::test]
    async fn empty_product_list_is_bad_request() {
        let (repo, svc) = seeded_service().await;
        let err = svc.create_order(1, vec![]).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(repo.orders.is_empty());
    }

    #[tokio::test]
    async fn seeding_validation_and_conflicts() {
        let (_repo, svc) = seeded_service().await;
        let blank = svc.add_customer(3, " ".into()).await;
        assert!(matches!(blank, Err(AppError::BadRequest(_))));

        let dup = svc.add_customer(1, "Other".into()).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        let negative = svc
            .add_product(3, "Refund".into(), Decimal::new(-5, 0))
            .await;
        assert!(matches!(negative, Err(AppError::BadRequest(_))));

        assert!(svc.get_customer(2).await.unwrap().is_some());
        assert!(svc.get_product(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn snapshot_total_survives_repricing_of_store() {
        let (repo, svc) = seeded_service().await;
        let order = svc.create_order(1, vec![1]).await.unwrap();
        if let Some(mut p) = repo.products.get_mut(&1) {
            p.price = Decimal::new(999, 0);
        }
        let fetched = svc.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_price, Decimal::new(100, 0));
        let repriced = repo.get_product(1).await.unwrap().unwrap();
        assert_eq!(repriced.price, Decimal::new(999, 0));
    }
}

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{NewOrder, Order, OrderId};
use orders_types::domain::product::{Product, ProductId};
use orders_types::ports::{CustomerRepository, OrderRepository, ProductRepository, RepoError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct InMemoryRepo {
    pub customers: Arc<DashMap<CustomerId, Customer>>,
    pub products: Arc<DashMap<ProductId, Product>>,
    pub orders: Arc<DashMap<OrderId, Order>>,
    next_order_id: Arc<AtomicI64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            customers: Arc::new(DashMap::new()),
            products: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
            next_order_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepo {
    async fn add_customer(&self, customer: Customer) -> Result<Customer, RepoError> {
        match self.customers.entry(customer.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "customer {} already exists",
                customer.id
            ))),
            Entry::Vacant(v) => {
                v.insert(customer.clone());
                Ok(customer)
            }
        }
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        Ok(self.customers.get(&id).map(|r| r.clone()))
    }

    async fn find_customer_by_name(&self, name: &str) -> Result<Option<Customer>, RepoError> {
        // Lowest id wins so the answer does not depend on shard iteration order.
        Ok(self
            .customers
            .iter()
            .filter(|kv| kv.value().name == name)
            .min_by_key(|kv| *kv.key())
            .map(|kv| kv.value().clone()))
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepo {
    async fn add_product(&self, product: Product) -> Result<Product, RepoError> {
        match self.products.entry(product.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "product {} already exists",
                product.id
            ))),
            Entry::Vacant(v) => {
                v.insert(product.clone());
                Ok(product)
            }
        }
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        Ok(self.products.get(&id).map(|r| r.clone()))
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, RepoError> {
        Ok(self
            .products
            .iter()
            .filter(|kv| kv.value().name == name)
            .min_by_key(|kv| *kv.key())
            .map(|kv| kv.value().clone()))
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepoError> {
        let wanted: HashSet<ProductId> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| self.products.get(&id).map(|r| r.clone()))
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepoError> {
        let id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        // The order becomes visible with all of its links in a single insert.
        let order = order.into_order(id);
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&id).map(|r| r.clone()))
    }
}

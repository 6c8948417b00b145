pub mod customer_repository;
pub mod order_repository;
pub mod product_repository;

pub use customer_repository::CustomerRepository;
pub use order_repository::{OrderRepository, RepoError};
pub use product_repository::ProductRepository;

/// Everything the order service needs from a data store.
pub trait OrderStore: CustomerRepository + ProductRepository + OrderRepository {}

impl<T> OrderStore for T where T: CustomerRepository + ProductRepository + OrderRepository {}

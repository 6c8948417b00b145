use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::customer::CustomerId;
use super::product::{Product, ProductId};

pub type OrderId = i64;

/// Join row between an order and one of its products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderProduct {
    pub order_id: OrderId,
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_price: Decimal,
    pub products: Vec<OrderProduct>,
    pub created_at: DateTime<Utc>,
}

/// An order that has been priced but not yet persisted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub total_price: Decimal,
    pub product_ids: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Prices `products` as given: one link per entry, duplicates included.
    pub fn new(customer_id: CustomerId, products: &[Product]) -> anyhow::Result<Self> {
        if products.is_empty() {
            anyhow::bail!("products empty");
        }
        let Some(total_price) = products
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.price))
        else {
            anyhow::bail!("total price overflow");
        };
        Ok(Self {
            customer_id,
            total_price,
            product_ids: products.iter().map(|p| p.id).collect(),
            created_at: Utc::now(),
        })
    }

    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            customer_id: self.customer_id,
            total_price: self.total_price,
            products: self
                .product_ids
                .into_iter()
                .map(|product_id| OrderProduct {
                    order_id: id,
                    product_id,
                })
                .collect(),
            created_at: self.created_at,
        }
    }
}

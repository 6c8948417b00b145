use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(id: ProductId, name: String, price: Decimal) -> anyhow::Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("product name empty");
        }
        if price.is_sign_negative() && !price.is_zero() {
            anyhow::bail!("product price must be >= 0");
        }
        Ok(Self { id, name, price })
    }
}

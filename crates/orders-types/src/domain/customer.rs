use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: String) -> anyhow::Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("customer name empty");
        }
        Ok(Self { id, name })
    }
}

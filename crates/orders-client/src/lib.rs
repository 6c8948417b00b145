use std::time::Duration;

use anyhow::Context;
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{Order, OrderId};
use orders_types::domain::product::{Product, ProductId};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct OrdersClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(OrdersClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<Option<T>> {
        let res = self.client.get(self.url(path)?).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            tracing::debug!(path, "resource not found");
            return Ok(None);
        }
        Ok(Some(res.error_for_status()?.json().await?))
    }

    pub async fn health(&self) -> anyhow::Result<()> {
        self.client
            .get(self.url("health")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn create_order(&self, req: CreateOrderRequest) -> anyhow::Result<Order> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    /// `Ok(None)` when the server has no order with this id.
    pub async fn get_order(&self, id: OrderId) -> anyhow::Result<Option<Order>> {
        self.get_optional(&format!("orders/{id}")).await
    }

    pub async fn create_customer(&self, req: CreateCustomerRequest) -> anyhow::Result<Customer> {
        let res = self
            .client
            .post(self.url("customers")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_customer(&self, id: CustomerId) -> anyhow::Result<Option<Customer>> {
        self.get_optional(&format!("customers/{id}")).await
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> anyhow::Result<Product> {
        let res = self
            .client
            .post(self.url("products")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_product(&self, id: ProductId) -> anyhow::Result<Option<Product>> {
        self.get_optional(&format!("products/{id}")).await
    }
}

impl OrdersClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        if let Some(client) = self.client {
            return Ok(OrdersClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(OrdersClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateCustomerRequest {
    pub id: CustomerId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateProductRequest {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

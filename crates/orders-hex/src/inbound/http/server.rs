use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    serve, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::errors::AppError;
use orders_types::domain::customer::{Customer, CustomerId};
use orders_types::domain::order::{Order, OrderId};
use orders_types::domain::product::{Product, ProductId};
use orders_types::ports::OrderStore;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: OrderStore,
{
    pub service: Arc<OrderService<R>>,
    pub config: HttpServerConfig,
}

#[derive(Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub id: CustomerId,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

impl<R> HttpServer<R>
where
    R: OrderStore,
{
    pub async fn new(service: OrderService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route("/orders", post(create_order::<R>))
            .route("/orders/{id}", get(get_order::<R>))
            .route("/customers", post(create_customer::<R>))
            .route("/customers/{id}", get(get_customer::<R>))
            .route("/products", post(create_product::<R>))
            .route("/products/{id}", get(get_product::<R>))
            .layer(trace_layer)
            .with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|e| AppError::BadRequest(format!("invalid id {raw:?}: {e}")))
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn create_order<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = service
        .create_order(payload.customer_id, payload.product_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id)?;
    service
        .get_order(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

async fn create_customer<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = service.add_customer(payload.id, payload.name).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let id: CustomerId = parse_id(&id)?;
    service
        .get_customer(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
}

async fn create_product<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = service
        .add_product(payload.id, payload.name, payload.price)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product<R: OrderStore>(
    State(service): State<Arc<OrderService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id: ProductId = parse_id(&id)?;
    service
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

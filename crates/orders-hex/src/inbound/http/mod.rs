mod server;

pub use server::{
    CreateCustomerRequest, CreateOrderRequest, CreateProductRequest, HttpServer, HttpServerConfig,
};

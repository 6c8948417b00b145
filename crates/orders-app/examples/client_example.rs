///  To run :
///  cargo r --example client_example
use orders_client::{CreateCustomerRequest, CreateOrderRequest, CreateProductRequest, OrdersClient};
use orders_hex::application::order_service::OrderService;
use orders_hex::inbound::http::{HttpServer, HttpServerConfig};
use orders_repo::build_repo;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("orders.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let service = OrderService::new(repo);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = OrdersClient::new(&addr)?;
    client
        .create_customer(CreateCustomerRequest {
            id: 1,
            name: "John Doe".into(),
        })
        .await?;
    for (id, price) in [(1, Decimal::new(100, 0)), (2, Decimal::new(1999, 2))] {
        client
            .create_product(CreateProductRequest {
                id,
                name: format!("Product {id}"),
                price,
            })
            .await?;
    }

    let created = client
        .create_order(CreateOrderRequest {
            customer_id: 1,
            product_ids: vec![1, 2, 2],
        })
        .await?;
    println!(
        "Created order id={} total={} lines={}",
        created.id,
        created.total_price,
        created.products.len()
    );

    let fetched = client.get_order(created.id).await?;
    println!("Fetched {:?}", fetched.map(|o| o.total_price));

    match client
        .create_order(CreateOrderRequest {
            customer_id: 999,
            product_ids: vec![1],
        })
        .await
    {
        Ok(order) => anyhow::bail!("unexpected order {}", order.id),
        Err(err) => {
            if err.downcast_ref::<reqwest::Error>().and_then(|e| e.status())
                == Some(StatusCode::NOT_FOUND)
            {
                println!("Unknown customer rejected as expected");
            } else {
                return Err(err);
            }
        }
    }

    handle.abort();
    Ok(())
}

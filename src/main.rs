mod api;
mod config;
mod db;
mod error;
mod ledger;
mod models;
mod payout;
mod quiz;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    config::load_env();
    tracing_subscriber::fmt::init();

    db::init_db().await.expect("Database failed");

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any) // You can replace Any with a specific origin
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::user::routes())
        .merge(api::tasks::routes())
        .merge(api::wallet::routes())
        .merge(api::admin::routes())
        .layer(cors);

    let addr = config::bind_addr();
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

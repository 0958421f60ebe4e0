use std::sync::Arc;

use log::info;
use tubefetch::{config::AppContext, server, util};

#[tokio::main]
async fn main() {
    env_logger::init();

    // A missing API key is not checked here; it surfaces on the first
    // playlist request.
    let ctx = AppContext::from_env();
    let addr = ctx.bind_addr.clone();

    // Create HttpClient
    let client = util::HttpClient::new().expect("Could not create HttpClient");

    let app = server::router(server::AppState {
        ctx: Arc::new(ctx),
        http: Arc::new(client),
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Could not bind address");

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}

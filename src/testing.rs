//! Shared HTTP test server helpers.

use axum::Router;
use tokio::net::TcpListener;

/// Spawn `router` on a random localhost port and return its base URL.
/// The server task dies with the test runtime; no explicit shutdown.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test HTTP listener");
    let addr = listener
        .local_addr()
        .expect("read test listener local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("run test HTTP server");
    });

    format!("http://{}", addr)
}

use axum::Router;
use rideline_services::{ServiceEndpoints, Services};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Every service client pointed at the same mock backend.
pub async fn services_for(router: Router) -> Services {
    let base = serve(router).await;
    Services::with_client(reqwest::Client::new(), &ServiceEndpoints::all_at(&base)).unwrap()
}

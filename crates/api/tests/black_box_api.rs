use std::sync::Arc;

use catalog_api::app::services::ProductService;
use catalog_infra::config::UploadSettings;
use catalog_infra::document_store::{InMemoryProductStore, ProductStore, StoreError};
use catalog_infra::object_store::{InMemoryObjectStore, ObjectStore, ObjectStoreError};
use catalog_products::{Product, ProductKey, ProductQuery};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: ProductService) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = catalog_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn in_memory() -> (Self, Arc<InMemoryObjectStore>) {
        let objects = Arc::new(InMemoryObjectStore::new());
        let services = ProductService::new(
            Arc::new(InMemoryProductStore::new()),
            objects.clone(),
            UploadSettings::default(),
        );
        (Self::spawn(services).await, objects)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Object store whose endpoint cannot be reached.
struct UnreachableObjectStore;

#[async_trait::async_trait]
impl ObjectStore for UnreachableObjectStore {
    async fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        Err(ObjectStoreError::Unavailable(
            "dispatch failure: connection refused".to_string(),
        ))
    }

    fn store_type(&self) -> &'static str {
        "unreachable"
    }
}

/// Object store that cannot build requests at all.
struct MisconfiguredObjectStore;

#[async_trait::async_trait]
impl ObjectStore for MisconfiguredObjectStore {
    async fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        Err(ObjectStoreError::Misconfigured("missing credentials provider".to_string()))
    }

    fn store_type(&self) -> &'static str {
        "misconfigured"
    }
}

/// Document store that fails every call.
struct FailingProductStore;

#[async_trait::async_trait]
impl ProductStore for FailingProductStore {
    async fn load(&self, _key: &ProductKey) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("timeout".to_string()))
    }

    async fn put(&self, _product: Product) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("timeout".to_string()))
    }

    async fn delete(&self, _key: &ProductKey) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("timeout".to_string()))
    }

    async fn query(&self, _query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Rejected("ResourceNotFoundException".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

async fn save(client: &reqwest::Client, srv: &TestServer, body: serde_json::Value) {
    let res = client
        .post(srv.url("/api/product/save"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn search(client: &reqwest::Client, srv: &TestServer, path_and_query: &str) -> Vec<serde_json::Value> {
    let res = client
        .get(srv.url(path_and_query))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

fn names(items: &[serde_json::Value]) -> Vec<&str> {
    items.iter().map(|p| p["name"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (srv, _) = TestServer::in_memory().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn save_then_get_returns_the_record() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    save(
        &client,
        &srv,
        json!({ "category": "books", "name": "Go101", "price": 19.99, "author": "Tapir Liu" }),
    )
    .await;

    let res = client
        .get(srv.url("/api/product/get/books/Go101"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "category": "books", "name": "Go101", "price": 19.99, "author": "Tapir Liu" })
    );
}

#[tokio::test]
async fn get_missing_is_ok_and_empty() {
    let (srv, _) = TestServer::in_memory().await;

    let res = reqwest::get(srv.url("/api/product/get/books/missing"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_overwrites_existing_record() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    save(&client, &srv, json!({ "category": "books", "name": "Go101", "price": 19.99 })).await;
    save(&client, &srv, json!({ "category": "books", "name": "Go101", "price": 24.5 })).await;

    let body: serde_json::Value = client
        .get(srv.url("/api/product/get/books/Go101"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["price"], 24.5);
}

#[tokio::test]
async fn delete_then_get_is_empty_and_repeat_delete_is_ok() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    save(&client, &srv, json!({ "category": "books", "name": "Go101", "price": 19.99 })).await;

    for _ in 0..2 {
        let res = client
            .delete(srv.url("/api/product/delete/books/Go101"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(srv.url("/api/product/get/books/Go101"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn search_applies_optional_filters() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    save(&client, &srv, json!({ "category": "books", "name": "A", "price": 10 })).await;
    save(&client, &srv, json!({ "category": "books", "name": "B", "price": 30 })).await;
    save(&client, &srv, json!({ "category": "games", "name": "A", "price": 5 })).await;

    let all = search(&client, &srv, "/api/product/search/books").await;
    assert_eq!(names(&all), vec!["A", "B"]);
    assert!(all.iter().all(|p| p["category"] == "books"));

    let cheap = search(&client, &srv, "/api/product/search/books?price=20").await;
    assert_eq!(names(&cheap), vec!["A"]);

    let by_name = search(&client, &srv, "/api/product/search/books?productName=B").await;
    assert_eq!(names(&by_name), vec!["B"]);

    let both = search(&client, &srv, "/api/product/search/books?productName=B&price=20").await;
    assert!(both.is_empty());

    let blank_name = search(&client, &srv, "/api/product/search/books?productName=").await;
    assert_eq!(names(&blank_name), vec!["A", "B"]);
}

#[tokio::test]
async fn search_rejects_malformed_price() {
    let (srv, _) = TestServer::in_memory().await;

    let res = reqwest::get(srv.url("/api/product/search/books?price=cheap"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_rejects_non_finite_price() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    save(&client, &srv, json!({ "category": "books", "name": "A", "price": 10 })).await;

    for price in ["NaN", "inf", "-inf"] {
        let res = client
            .get(srv.url(&format!("/api/product/search/books?price={price}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "price={price}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn save_rejects_empty_key() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/product/save"))
        .json(&json!({ "category": "books", "name": "", "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn store_failures_are_server_errors() {
    let srv = TestServer::spawn(ProductService::new(
        Arc::new(FailingProductStore),
        Arc::new(InMemoryObjectStore::new()),
        UploadSettings::default(),
    ))
    .await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/product/get/books/Go101"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_error");

    let res = client
        .get(srv.url("/api/product/search/books"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn savebucket_uploads_fixed_text() {
    let (srv, objects) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/product/savebucket"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "Text file successfully uploaded to S3."
    );

    let obj = objects.get("ak-aws-bucket-8122", "example.txt").unwrap();
    assert_eq!(obj.body, b"Hello, world!");
}

#[tokio::test]
async fn savebucket_reports_unreachable_store() {
    let srv = TestServer::spawn(ProductService::new(
        Arc::new(InMemoryProductStore::new()),
        Arc::new(UnreachableObjectStore),
        UploadSettings::default(),
    ))
    .await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/product/savebucket"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = res.text().await.unwrap();
    assert!(text.starts_with("Error: "));
    assert!(text.contains("connection refused"));
}

#[tokio::test]
async fn savebucket_hides_misconfiguration_details() {
    let srv = TestServer::spawn(ProductService::new(
        Arc::new(InMemoryProductStore::new()),
        Arc::new(MisconfiguredObjectStore),
        UploadSettings::default(),
    ))
    .await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/product/savebucket"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "internal_error");
    assert!(!body["message"].as_str().unwrap().contains("credentials"));
}

//! Behaviour scenarios for the products API
//!
//! Each scenario starts from the same background: every existing product is
//! deleted over HTTP, then the catalog below is loaded through `POST`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// name, category, available, price
const CATALOG: [(&str, &str, &str, f64); 5] = [
    ("Hat", "CLOTHS", "True", 59.95),
    ("Shoes", "CLOTHS", "False", 120.50),
    ("Big Mac", "FOOD", "True", 5.99),
    ("Sheets", "HOUSEWARES", "True", 87.00),
    ("Special Product", "TOOLS", "no", 34.00),
];

struct World {
    app: Router,
}

impl World {
    fn new(repository: InMemoryProductRepository) -> Self {
        Self {
            app: handlers::router(ProductService::new(repository)),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn list(&self, query: &str) -> Vec<Value> {
        let (status, body) = self.send("GET", &format!("/{}", query), None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().unwrap()
    }

    /// Given the following products
    async fn background(&self) {
        for product in self.list("").await {
            let id = product["id"].as_i64().unwrap();
            let (status, _) = self.send("DELETE", &format!("/{}", id), None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        for (name, category, available, price) in CATALOG {
            let payload = json!({
                "name": name,
                "price": price,
                "category": category,
                "available": query::parse_availability(available),
            });
            let (status, _) = self.send("POST", "/", Some(&payload)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    async fn find_one(&self, name: &str) -> Value {
        let mut found = self.list(&format!("?name={}", name.replace(' ', "%20"))).await;
        assert_eq!(found.len(), 1, "expected a single {name}");
        found.remove(0)
    }
}

fn names(products: &[Value]) -> Vec<&str> {
    products.iter().map(|p| p["name"].as_str().unwrap()).collect()
}

async fn given_catalog() -> World {
    let repository = InMemoryProductRepository::new();

    // Leftovers from an earlier run must be cleared by the background
    repository
        .create(Product::new("Stale", 1.0, Category::Unknown))
        .await
        .unwrap();

    let world = World::new(repository);
    world.background().await;
    world
}

#[tokio::test]
async fn scenario_list_all_products() {
    let world = given_catalog().await;

    let products = world.list("").await;

    assert_eq!(
        names(&products),
        ["Hat", "Shoes", "Big Mac", "Sheets", "Special Product"]
    );
}

#[tokio::test]
async fn scenario_search_by_name() {
    let world = given_catalog().await;

    let products = world.list("?name=Special%20Product").await;

    assert_eq!(names(&products), ["Special Product"]);
    assert_eq!(products[0]["category"], "TOOLS");
}

#[tokio::test]
async fn scenario_search_by_category() {
    let world = given_catalog().await;

    let products = world.list("?category=Cloths").await;

    assert_eq!(names(&products), ["Hat", "Shoes"]);
}

#[tokio::test]
async fn scenario_search_by_availability() {
    let world = given_catalog().await;

    let available = world.list("?available=true").await;
    let unavailable = world.list("?available=False").await;

    assert_eq!(names(&available), ["Hat", "Big Mac", "Sheets"]);
    assert_eq!(names(&unavailable), ["Shoes", "Special Product"]);
}

#[tokio::test]
async fn scenario_all_filters_resolve_to_name() {
    let world = given_catalog().await;

    let products = world
        .list("?name=Sheets&category=FOOD&available=false")
        .await;

    assert_eq!(names(&products), ["Sheets"]);
}

#[tokio::test]
async fn scenario_update_a_product() {
    let world = given_catalog().await;
    let mut hat = world.find_one("Hat").await;
    let id = hat["id"].as_i64().unwrap();

    hat["description"] = json!("Fedora");
    hat["price"] = json!(64.95);
    let (status, updated) = world.send("PUT", &format!("/{}", id), Some(&hat)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, hat);

    let (_, fetched) = world.send("GET", &format!("/{}", id), None).await;
    assert_eq!(fetched["description"], "Fedora");
    assert_eq!(fetched["price"], 64.95);
}

#[tokio::test]
async fn scenario_delete_a_product() {
    let world = given_catalog().await;
    let shoes = world.find_one("Shoes").await;
    let id = shoes["id"].as_i64().unwrap();

    let (status, body) = world.send("DELETE", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let remaining = world.list("").await;
    assert_eq!(remaining.len(), CATALOG.len() - 1);
    assert!(!names(&remaining).contains(&"Shoes"));
}

#[tokio::test]
async fn scenario_widget_lifecycle() {
    let world = World::new(InMemoryProductRepository::new());

    let (status, created) = world
        .send(
            "POST",
            "/",
            Some(&json!({"name": "Widget", "price": 9.99, "category": "TOOLS"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["available"], true);
    assert_eq!(created["category"], "TOOLS");
    let id = created["id"].as_i64().expect("id assigned");
    let uri = format!("/{}", id);

    let (status, fetched) = world.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let mut changed = created.clone();
    changed["description"] = json!("new");
    let (status, updated) = world.send("PUT", &uri, Some(&changed)).await;
    assert_eq!(status, StatusCode::OK);
    for field in ["id", "name", "price", "available", "category"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert_eq!(updated["description"], "new");

    let (status, _) = world.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = world.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

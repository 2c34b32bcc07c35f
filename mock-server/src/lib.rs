use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of create and update. Numeric fields are optional here so that a
/// missing value is reported as a 400 rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}

struct Valid {
    name: String,
    description: Option<String>,
    quantity: i32,
    price: f64,
}

impl ProductRequest {
    fn validate(self) -> Result<Valid, (StatusCode, Json<ErrorBody>)> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Product name is required".to_string());
        }
        match self.quantity {
            None => errors.push("Quantity is required".to_string()),
            Some(q) if q < 0 => errors.push("Quantity must be zero or positive".to_string()),
            Some(_) => {}
        }
        match self.price {
            None => errors.push("Price is required".to_string()),
            Some(p) if p < 0.0 => errors.push("Price must be zero or positive".to_string()),
            Some(_) => {}
        }
        match (self.quantity, self.price) {
            (Some(quantity), Some(price)) if errors.is_empty() => Ok(Valid {
                name: self.name,
                description: self.description,
                quantity,
                price,
            }),
            _ => Err((StatusCode::BAD_REQUEST, Json(ErrorBody { errors }))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    pub threshold: Option<i32>,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route("/products/low-stock", get(low_stock_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Product>> {
    let store = db.read().await;
    Json(store.products.values().cloned().collect())
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ErrorBody>)> {
    let input = input.validate()?;
    let mut store = db.write().await;
    store.next_id += 1;
    let now = Local::now().naive_local();
    let product = Product {
        id: store.next_id,
        name: input.name,
        description: input.description,
        quantity: input.quantity,
        price: input.price,
        created_at: now,
        updated_at: now,
    };
    store.products.insert(product.id, product.clone());
    info!(id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, StatusCode> {
    let store = db.read().await;
    store.products.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ProductRequest>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorBody>)> {
    let input = input.validate()?;
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or_else(|| {
        let errors = vec![format!("Product not found with id: {id}")];
        (StatusCode::NOT_FOUND, Json(ErrorBody { errors }))
    })?;
    product.name = input.name;
    product.description = input.description;
    product.quantity = input.quantity;
    product.price = input.price;
    product.updated_at = Local::now().naive_local();
    info!(id, "product updated");
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .products
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn search_products(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Product>> {
    let needle = params.name.to_lowercase();
    debug!(%needle, "searching products");
    let store = db.read().await;
    Json(
        store
            .products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

async fn low_stock_products(
    State(db): State<Db>,
    Query(params): Query<LowStockParams>,
) -> Json<Vec<Product>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let store = db.read().await;
    Json(
        store
            .products
            .values()
            .filter(|p| p.quantity < threshold)
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> ProductRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn product_serializes_camel_case() {
        let at = NaiveDateTime::parse_from_str("2024-03-01T09:15:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            quantity: 5,
            price: 2.5,
            created_at: at,
            updated_at: at,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["createdAt"], "2024-03-01T09:15:00");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn request_without_description_is_accepted() {
        let valid = request(r#"{"name":"Widget","quantity":5,"price":2.5}"#)
            .validate()
            .unwrap();
        assert_eq!(valid.name, "Widget");
        assert!(valid.description.is_none());
    }

    #[test]
    fn blank_name_and_negative_values_are_rejected() {
        let (status, Json(body)) = request(r#"{"name":"  ","quantity":-1,"price":-2}"#)
            .validate()
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors.len(), 3);
    }

    #[test]
    fn missing_quantity_is_rejected() {
        let (_, Json(body)) = request(r#"{"name":"Widget","price":1}"#)
            .validate()
            .err()
            .unwrap();
        assert_eq!(body.errors, vec!["Quantity is required".to_string()]);
    }

    #[test]
    fn request_rejects_missing_name() {
        let result: Result<ProductRequest, _> = serde_json::from_str(r#"{"quantity":1,"price":1}"#);
        assert!(result.is_err());
    }
}

//! Domain DTOs for the product API.
//!
//! # Design
//! These types mirror the server's JSON schema (camelCase keys) but are
//! defined independently from the mock-server crate. Integration tests catch
//! any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A product as returned by the API.
///
/// `id` and the timestamps are assigned by the server and never written by
/// the client; they are absent only on values that have not been persisted.
/// Timestamps are kept as the server's text since the client only displays
/// them; offset and offset-free ISO-8601 forms are both accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Writable subset of a product, sent as the body of create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

impl From<&Product> for ProductRequest {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            quantity: product.quantity,
            price: product.price,
        }
    }
}

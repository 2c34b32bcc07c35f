//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The I/O happens in between, outside this module.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Product, ProductRequest};

/// Threshold used by the server when `low-stock` is queried without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Synchronous, stateless client for the product API.
#[derive(Debug, Clone)]
pub struct ProductClient {
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_products(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.resource_url(), None)
    }

    pub fn build_get_product(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id), None)
    }

    pub fn build_create_product(&self, input: &ProductRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, self.resource_url(), Some(body)))
    }

    pub fn build_update_product(&self, id: i64, input: &ProductRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, self.item_url(id), Some(body)))
    }

    pub fn build_delete_product(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id), None)
    }

    pub fn build_search_products(&self, name: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("name", name)
            .finish();
        let url = format!("{}/search?{query}", self.resource_url());
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_low_stock_products(&self, threshold: i32) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("threshold", &threshold.to_string())
            .finish();
        let url = format!("{}/low-stock?{query}", self.resource_url());
        self.request(HttpMethod::Get, url, None)
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_search_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_json(response)
    }

    pub fn parse_low_stock_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        parse_json(response)
    }

    fn resource_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/products/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

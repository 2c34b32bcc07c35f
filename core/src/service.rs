//! Async product service: one network round-trip per operation.
//!
//! # Design
//! `ProductService` pairs a `ProductClient` with a host-supplied `Transport`.
//! Every method builds a request, executes it exactly once, and parses the
//! response. There is no retry, caching or deduplication, so a failure from
//! the transport or the server reaches the caller unchanged.

use async_trait::async_trait;
use tracing::debug;

use crate::client::ProductClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Product, ProductRequest};

/// Executes a single HTTP exchange.
///
/// Implementations must return non-2xx responses as data; only failures that
/// produce no response at all should surface as `ApiError::Transport`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub struct ProductService<T> {
    client: ProductClient,
    transport: T,
}

impl<T: Transport> ProductService<T> {
    pub fn new(client: ProductClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.send(self.client.build_list_products()).await?;
        self.client.parse_list_products(response)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        let response = self.send(self.client.build_get_product(id)).await?;
        self.client.parse_get_product(response)
    }

    pub async fn create_product(&self, input: &ProductRequest) -> Result<Product, ApiError> {
        let response = self.send(self.client.build_create_product(input)?).await?;
        self.client.parse_create_product(response)
    }

    pub async fn update_product(&self, id: i64, input: &ProductRequest) -> Result<Product, ApiError> {
        let response = self.send(self.client.build_update_product(id, input)?).await?;
        self.client.parse_update_product(response)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_product(id)).await?;
        self.client.parse_delete_product(response)
    }

    pub async fn search_products(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        let response = self.send(self.client.build_search_products(name)).await?;
        self.client.parse_search_products(response)
    }

    pub async fn low_stock_products(&self, threshold: i32) -> Result<Vec<Product>, ApiError> {
        let response = self.send(self.client.build_low_stock_products(threshold)).await?;
        self.client.parse_low_stock_products(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "product api request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "product api response");
        Ok(response)
    }
}

//! Product list controller: the server-sourced snapshot plus selection.
//!
//! # Design
//! The snapshot is only ever replaced wholesale by a successful load; deletes
//! and saves trigger a reload instead of patching local state. Loads that
//! overlap are not ordered: whichever result is applied last wins.

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::service::{ProductService, Transport};
use crate::types::Product;

pub const LOAD_FAILED: &str = "Failed to load products. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete product. Please try again.";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this product?";

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed,
}

#[derive(Debug, Default)]
pub struct ProductList {
    products: Vec<Product>,
    state: LoadState,
    error: Option<String>,
    selected: Option<Product>,
}

impl ProductList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, product: Product) {
        debug!(product_id = ?product.id, "product selected");
        self.selected = Some(product);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Product>, ApiError>) {
        match result {
            Ok(products) => {
                debug!(count = products.len(), "products loaded");
                self.products = products;
                self.state = LoadState::Ready;
            }
            Err(error) => {
                warn!(%error, "loading products failed");
                self.error = Some(LOAD_FAILED.to_string());
                self.state = LoadState::Error;
            }
        }
    }

    pub async fn load<T: Transport>(&mut self, service: &ProductService<T>) {
        self.begin_load();
        let result = service.list_products().await;
        self.finish_load(result);
    }

    /// Delete `id` once `confirm` approves, then reload.
    pub async fn delete<T: Transport>(
        &mut self,
        service: &ProductService<T>,
        id: i64,
        confirm: &impl Confirm,
    ) -> DeleteOutcome {
        if !confirm.confirm(DELETE_CONFIRMATION) {
            debug!(product_id = id, "delete declined");
            return DeleteOutcome::Declined;
        }
        match service.delete_product(id).await {
            Ok(()) => {
                info!(product_id = id, "product deleted");
                self.load(service).await;
                DeleteOutcome::Deleted
            }
            Err(error) => {
                warn!(product_id = id, %error, "deleting product failed");
                self.error = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    /// Return to the default view after the form saved a product.
    pub async fn on_product_saved<T: Transport>(&mut self, service: &ProductService<T>) {
        self.clear_selection();
        self.load(service).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: Some(id),
            name: name.to_string(),
            description: None,
            quantity: 1,
            price: 1.0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let list = ProductList::new();
        assert_eq!(list.state(), LoadState::Idle);
        assert!(list.products().is_empty());
        assert!(list.selected().is_none());
    }

    #[test]
    fn successful_load_replaces_snapshot() {
        let mut list = ProductList::new();
        list.begin_load();
        list.finish_load(Ok(vec![product(1, "Widget"), product(2, "Gadget")]));
        list.begin_load();
        assert!(list.is_loading());
        list.finish_load(Ok(vec![product(3, "Sprocket")]));

        assert_eq!(list.state(), LoadState::Ready);
        assert_eq!(list.products(), &[product(3, "Sprocket")]);
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let mut list = ProductList::new();
        list.begin_load();
        list.finish_load(Ok(vec![product(1, "Widget")]));
        list.begin_load();
        list.finish_load(Err(ApiError::Transport("timeout".to_string())));

        assert_eq!(list.state(), LoadState::Error);
        assert_eq!(list.error(), Some(LOAD_FAILED));
        assert_eq!(list.products(), &[product(1, "Widget")]);

        list.begin_load();
        assert!(list.error().is_none());
    }

    #[test]
    fn late_response_overwrites_earlier_one() {
        let mut list = ProductList::new();
        list.begin_load();
        list.begin_load();
        list.finish_load(Ok(vec![product(2, "Newer")]));
        list.finish_load(Ok(vec![product(1, "Older")]));
        assert_eq!(list.products(), &[product(1, "Older")]);
    }

    #[test]
    fn selection_is_independent_of_loading() {
        let mut list = ProductList::new();
        list.select(product(1, "Widget"));
        list.begin_load();
        list.finish_load(Err(ApiError::NotFound));
        assert_eq!(list.selected(), Some(&product(1, "Widget")));
        list.clear_selection();
        assert!(list.selected().is_none());
    }
}

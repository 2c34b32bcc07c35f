//! Client core for the inventory product API.
//!
//! # Overview
//! `ProductClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `ProductService` runs those exchanges through a host-supplied `Transport`,
//! and the two controllers hold the state a product screen renders:
//! `ProductList` (snapshot, loading, selection) and `ProductForm` (draft,
//! validation, save).
//!
//! # Design
//! - `ProductClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit. The controllers repeat that split with
//!   `begin_*` / `finish_*` halves.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod service;
pub mod types;

pub use client::{ProductClient, DEFAULT_LOW_STOCK_THRESHOLD};
pub use error::ApiError;
pub use form::{
    Field, FieldError, FormEvent, FormMode, PendingSave, ProductDraft, ProductForm, SubmitOutcome,
    SubmitRejected, ValidationErrors,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{Confirm, DeleteOutcome, LoadState, ProductList};
pub use service::{ProductService, Transport};
pub use types::{Product, ProductRequest};

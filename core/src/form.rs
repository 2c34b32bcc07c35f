//! Create/edit form controller for a single product.
//!
//! # Design
//! Submission is split like the client: `begin_submit` validates and hands
//! back the save to perform, `finish_submit` consumes its outcome. A host
//! event loop can run the request between the two halves; `submit` runs
//! both for callers that simply `.await`.
//!
//! While a save is in flight, `begin_submit` is a no-op so one form never
//! has two requests outstanding.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::service::{ProductService, Transport};
use crate::types::{Product, ProductRequest};

pub const NAME_MIN_LEN: usize = 3;

pub const CREATE_FAILED: &str = "Failed to create product. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update product. Please try again.";

/// Editable field values. Numeric fields are `None` when left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            quantity: Some(0),
            price: Some(0.0),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            quantity: Some(product.quantity),
            price: Some(product.price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Quantity,
    Price,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Quantity => "quantity",
            Field::Price => "price",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("quantity is required")]
    QuantityRequired,
    #[error("quantity must be zero or positive")]
    QuantityNegative,
    #[error("price is required")]
    PriceRequired,
    #[error("price must be zero or positive")]
    PriceNegative,
    #[error("price must be a finite number")]
    PriceNotFinite,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::NameRequired | FieldError::NameTooShort { .. } => Field::Name,
            FieldError::QuantityRequired | FieldError::QuantityNegative => Field::Quantity,
            FieldError::PriceRequired
            | FieldError::PriceNegative
            | FieldError::PriceNotFinite => Field::Price,
        }
    }
}

/// Every failing field of a draft, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid product: {}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

fn join(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl ProductDraft {
    /// Check the local rules and produce the request body.
    pub fn validate(&self) -> Result<ProductRequest, ValidationErrors> {
        let mut errors = Vec::new();

        let name_len = self.name.chars().count();
        if name_len == 0 {
            errors.push(FieldError::NameRequired);
        } else if name_len < NAME_MIN_LEN {
            errors.push(FieldError::NameTooShort { min: NAME_MIN_LEN });
        }

        match self.quantity {
            None => errors.push(FieldError::QuantityRequired),
            Some(q) if q < 0 => errors.push(FieldError::QuantityNegative),
            Some(_) => {}
        }

        match self.price {
            None => errors.push(FieldError::PriceRequired),
            // NaN and infinities serialize as JSON null.
            Some(p) if !p.is_finite() => errors.push(FieldError::PriceNotFinite),
            Some(p) if p < 0.0 => errors.push(FieldError::PriceNegative),
            Some(_) => {}
        }

        match (errors.is_empty(), self.quantity, self.price) {
            (true, Some(quantity), Some(price)) => Ok(ProductRequest {
                name: self.name.clone(),
                description: (!self.description.is_empty()).then(|| self.description.clone()),
                quantity,
                price,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// The request a submission should perform.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingSave {
    Create(ProductRequest),
    Update { id: i64, request: ProductRequest },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a save is already in progress")]
    InFlight,
    #[error(transparent)]
    Invalid(ValidationErrors),
}

/// Signals the form emits to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Saved(Product),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Product),
    Failed,
    Rejected(SubmitRejected),
}

#[derive(Debug, Default)]
pub struct ProductForm {
    draft: ProductDraft,
    backing: Option<Product>,
    loading: bool,
    error: Option<String>,
    field_errors: ValidationErrors,
    pending: Option<FormMode>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the form to `product` (edit mode) or to nothing (create mode).
    ///
    /// Either way the previous draft is discarded. A save already in flight
    /// stays tied to the old binding: its `finish_submit` reports against the
    /// old mode and clears the new draft on success, so callers must not
    /// rebind until that save has finished.
    pub fn set_product(&mut self, product: Option<&Product>) {
        match product {
            Some(product) => {
                self.draft = ProductDraft::from(product);
                self.backing = Some(product.clone());
            }
            None => {
                self.draft = ProductDraft::default();
                self.backing = None;
            }
        }
        self.field_errors = ValidationErrors::default();
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    pub fn mode(&self) -> FormMode {
        match self.backing.as_ref().and_then(|p| p.id) {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Errors from the last blocked submission.
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn begin_submit(&mut self) -> Result<PendingSave, SubmitRejected> {
        if self.loading {
            debug!("submit ignored: save in flight");
            return Err(SubmitRejected::InFlight);
        }
        let request = match self.draft.validate() {
            Ok(request) => request,
            Err(errors) => {
                debug!(%errors, "submit blocked by validation");
                self.field_errors = errors.clone();
                return Err(SubmitRejected::Invalid(errors));
            }
        };

        self.field_errors = ValidationErrors::default();
        self.loading = true;
        self.error = None;
        let mode = self.mode();
        self.pending = Some(mode);

        Ok(match mode {
            FormMode::Create => PendingSave::Create(request),
            FormMode::Edit(id) => PendingSave::Update { id, request },
        })
    }

    /// Apply the outcome of the save started by `begin_submit`.
    ///
    /// Returns the completion event on success.
    pub fn finish_submit(&mut self, result: Result<Product, ApiError>) -> Option<FormEvent> {
        let Some(mode) = self.pending.take() else {
            warn!("save result arrived with no save in flight");
            return None;
        };
        self.loading = false;

        match result {
            Ok(product) => {
                info!(product_id = ?product.id, "product saved");
                self.draft = ProductDraft::default();
                self.backing = None;
                Some(FormEvent::Saved(product))
            }
            Err(error) => {
                let message = match mode {
                    FormMode::Create => CREATE_FAILED,
                    FormMode::Edit(_) => UPDATE_FAILED,
                };
                warn!(%error, ?mode, "product save failed");
                self.error = Some(message.to_string());
                None
            }
        }
    }

    pub async fn submit<T: Transport>(&mut self, service: &ProductService<T>) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };
        let result = match &pending {
            PendingSave::Create(request) => service.create_product(request).await,
            PendingSave::Update { id, request } => service.update_product(*id, request).await,
        };
        match self.finish_submit(result) {
            Some(FormEvent::Saved(product)) => SubmitOutcome::Saved(product),
            _ => SubmitOutcome::Failed,
        }
    }

    pub fn cancel(&mut self) -> FormEvent {
        self.draft = ProductDraft::default();
        self.backing = None;
        self.error = None;
        self.field_errors = ValidationErrors::default();
        FormEvent::Cancelled
    }
}

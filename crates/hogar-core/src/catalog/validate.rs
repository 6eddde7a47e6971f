//! Admin form validation for product drafts.
//!
//! The catalog store itself accepts any draft; callers run these checks
//! before submitting so that the user sees every problem at once.

use serde::Serialize;
use std::fmt;

use crate::catalog::ProductDraft;
use crate::error::CommerceError;
use crate::money::Money;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const MAX_PRICE: Money = Money::new(999_999_999.0);

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ProductDraft {
    /// Every field problem in form order. `has_offer` mirrors the form's
    /// "on sale" switch, which requires an original price above the price.
    pub fn validate(&self, has_offer: bool) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len < NAME_MIN_CHARS {
            errors.push(FieldError::new(
                "name",
                "El nombre debe tener al menos 3 caracteres",
            ));
        } else if name_len > NAME_MAX_CHARS {
            errors.push(FieldError::new(
                "name",
                "El nombre no puede superar 100 caracteres",
            ));
        }

        if !self.price.amount().is_finite() || !self.price.is_positive() {
            errors.push(FieldError::new("price", "El precio debe ser mayor a 0"));
        } else if self.price > MAX_PRICE {
            errors.push(FieldError::new("price", "El precio es demasiado alto"));
        }

        if let Some(original) = self.original_price {
            if !original.is_positive() {
                errors.push(FieldError::new(
                    "originalPrice",
                    "El precio original debe ser mayor a 0",
                ));
            } else if has_offer && original <= self.price {
                errors.push(FieldError::new(
                    "originalPrice",
                    "El precio original debe ser mayor al precio de oferta",
                ));
            }
        } else if has_offer {
            errors.push(FieldError::new(
                "originalPrice",
                "Debes ingresar un precio original para aplicar la oferta",
            ));
        }

        let description_len = self.description.trim().chars().count();
        if description_len < DESCRIPTION_MIN_CHARS {
            errors.push(FieldError::new(
                "description",
                "La descripción debe tener al menos 10 caracteres",
            ));
        } else if description_len > DESCRIPTION_MAX_CHARS {
            errors.push(FieldError::new(
                "description",
                "La descripción no puede superar 500 caracteres",
            ));
        }

        errors
    }

    /// [`validate`](Self::validate) folded into a single error.
    pub fn check(&self, has_offer: bool) -> Result<(), CommerceError> {
        let errors = self.validate(has_offer);
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CommerceError::ValidationError(joined))
    }
}

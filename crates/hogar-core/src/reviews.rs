//! Customer reviews, newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{next_timestamp_id, ProductId, ReviewId};
use crate::search::RatingLookup;

/// A customer review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A review as submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl NewReview {
    pub fn new(product_id: ProductId, user_name: impl Into<String>, rating: u8) -> Self {
        Self {
            product_id,
            user_name: user_name.into(),
            rating,
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// All reviews across products. Aggregates are computed on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewLog {
    pub reviews: Vec<Review>,
}

impl ReviewLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a review at the front of the log.
    pub fn add(&mut self, review: NewReview) -> Result<ReviewId, CommerceError> {
        if !(1..=5).contains(&review.rating) {
            return Err(CommerceError::ValidationError(format!(
                "la calificación debe estar entre 1 y 5, se recibió {}",
                review.rating
            )));
        }
        if review.user_name.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "el nombre de quien reseña no puede estar vacío".to_string(),
            ));
        }

        let floor = self.reviews.iter().map(|r| r.id.get()).max().unwrap_or(0);
        let id = ReviewId::new(next_timestamp_id(floor));
        self.reviews.insert(
            0,
            Review {
                id,
                product_id: review.product_id,
                user_name: review.user_name,
                rating: review.rating,
                comment: review.comment,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(id = %id, product = %review.product_id, "review added");
        Ok(id)
    }

    /// A product's reviews, newest first.
    pub fn product_reviews(&self, product: ProductId) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|r| r.product_id == product)
            .collect()
    }

    /// Mean rating rounded to one decimal; 0 with no reviews.
    pub fn average_rating(&self, product: ProductId) -> f64 {
        let (sum, count) = self
            .reviews
            .iter()
            .filter(|r| r.product_id == product)
            .fold((0u32, 0u32), |(sum, count), r| {
                (sum + u32::from(r.rating), count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        (f64::from(sum) / f64::from(count) * 10.0).round() / 10.0
    }

    pub fn review_count(&self, product: ProductId) -> usize {
        self.reviews.iter().filter(|r| r.product_id == product).count()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

impl RatingLookup for ReviewLog {
    fn average_rating(&self, product: ProductId) -> f64 {
        ReviewLog::average_rating(self, product)
    }
}

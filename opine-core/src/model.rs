//! Domain records
//!
//! Core primitives for the review application:
//! - Users: account holders, review authors
//! - Businesses: review targets, each owned by one user
//! - Reviews: four category ratings plus a location tag, at most one per
//!   (user, business) pair
//!
//! Row structs mirror the database schema; the `New*` payloads carry
//! validated input on its way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::rating::{Location, Rating, RatingCategory};
use super::validation::{self, ValidationError};

// ============================================================================
// Users
// ============================================================================

/// An account holder. The password hash never serializes into template data.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a registered user. The hash is produced by the auth
/// layer; this type never holds a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

// ============================================================================
// Businesses
// ============================================================================

/// A business listed for review, owned by the user who created it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub owner_id: i64,
}

impl NewBusiness {
    /// Validate a raw form name into an insert payload.
    pub fn validated(name: &str, owner_id: i64) -> Result<Self, ValidationError> {
        let name = validation::validate_business_name(name)?;
        Ok(Self { name, owner_id })
    }
}

// ============================================================================
// Reviews
// ============================================================================

/// A stored review. Ratings are kept as raw column values; they were
/// validated on the way in, and `rating()` re-wraps them for aggregation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub business_id: i64,
    pub rating_place: i64,
    pub rating_price: i64,
    pub rating_installations: i64,
    pub rating_service: i64,
    pub location: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// The stored score for one category.
    pub fn rating(&self, category: RatingCategory) -> Rating {
        let value = match category {
            RatingCategory::Place => self.rating_place,
            RatingCategory::Price => self.rating_price,
            RatingCategory::Installations => self.rating_installations,
            RatingCategory::Service => self.rating_service,
        };
        Rating::new_unchecked(value as u8)
    }

    /// The stored location tag, if the column still parses.
    pub fn location_tag(&self) -> Option<Location> {
        Location::parse(&self.location).ok()
    }
}

/// Raw review form input, exactly as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub place: i64,
    pub price: i64,
    pub installations: i64,
    pub service: i64,
    pub location: String,
    #[serde(default)]
    pub comment: String,
}

/// Validated upsert payload for a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub business_id: i64,
    pub place: Rating,
    pub price: Rating,
    pub installations: Rating,
    pub service: Rating,
    pub location: Location,
    pub comment: String,
}

impl NewReview {
    /// Validate raw form input into an upsert payload.
    ///
    /// Each rating must be within 1..=10 and the location must be one of
    /// the known tags; the first failing field wins.
    pub fn validated(
        user_id: i64,
        business_id: i64,
        raw: &RawReview,
    ) -> Result<Self, ValidationError> {
        let place = Rating::from_value(raw.place, "place rating")?;
        let price = Rating::from_value(raw.price, "price rating")?;
        let installations = Rating::from_value(raw.installations, "installations rating")?;
        let service = Rating::from_value(raw.service, "service rating")?;
        let location = Location::parse(&raw.location)?;
        validation::validate_comment(&raw.comment)?;

        Ok(Self {
            user_id,
            business_id,
            place,
            price,
            installations,
            service,
            location,
            comment: raw.comment.trim().to_owned(),
        })
    }

    /// The score for one category.
    pub fn rating(&self, category: RatingCategory) -> Rating {
        match category {
            RatingCategory::Place => self.place,
            RatingCategory::Price => self.price,
            RatingCategory::Installations => self.installations,
            RatingCategory::Service => self.service,
        }
    }
}

// ============================================================================
// Display projections
// ============================================================================

/// Business with owner name and review count for the landing page list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusinessSummary {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its author's username for the business page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub business_id: i64,
    pub rating_place: i64,
    pub rating_price: i64,
    pub rating_installations: i64,
    pub rating_service: i64,
    pub location: String,
    pub comment: String,
    pub updated_at: DateTime<Utc>,
}

impl ReviewWithAuthor {
    /// Human-readable location label for templates.
    pub fn location_label(&self) -> &'static str {
        match Location::parse(&self.location) {
            Ok(loc) => loc.label(),
            Err(_) => "Unknown",
        }
    }
}

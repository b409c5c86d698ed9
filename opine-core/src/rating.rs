//! Rating and location primitives
//!
//! A review scores four categories on a 1-10 scale and tags the business
//! location as convenient or not. Both values arrive as untrusted form
//! input, so construction goes through validation; the rest of the crate
//! only ever sees in-range values.

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Inclusive rating scale bounds.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;

/// A single category score, guaranteed to be within 1..=10.
///
/// Serializes as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw form value into a rating.
    ///
    /// # Arguments
    /// * `value` - Raw integer from the form layer
    /// * `field` - Field name used in the error message
    pub fn from_value(value: i64, field: &'static str) -> Result<Self, ValidationError> {
        if (RATING_MIN as i64..=RATING_MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::OutOfRange {
                field,
                min: RATING_MIN as i64,
                max: RATING_MAX as i64,
                value,
            })
        }
    }

    /// Create a rating without validation (for trusted values, e.g. rows
    /// already persisted through `from_value`).
    pub fn new_unchecked(value: u8) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four scored aspects of a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingCategory {
    Place,
    Price,
    Installations,
    Service,
}

impl RatingCategory {
    /// All categories, in the order the review form and dashboard show them.
    pub const ALL: [RatingCategory; 4] = [
        RatingCategory::Place,
        RatingCategory::Price,
        RatingCategory::Installations,
        RatingCategory::Service,
    ];

    /// Stable key used in URLs and template data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Place => "place",
            Self::Price => "price",
            Self::Installations => "installations",
            Self::Service => "service",
        }
    }

    /// Human-readable label for headings and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Place => "Place",
            Self::Price => "Price",
            Self::Installations => "Installations",
            Self::Service => "Service",
        }
    }

    /// Parse a URL segment like `place` back into a category.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Location convenience tag attached to every review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Convenient,
    NotConvenient,
}

impl Location {
    /// Both variants, in display order.
    pub const ALL: [Location; 2] = [Location::Convenient, Location::NotConvenient];

    /// Parse a form or database value.
    ///
    /// Accepts the stored key (`convenient` / `not_convenient`) and the
    /// spaced spelling, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_lowercase().as_str() {
            "convenient" => Ok(Self::Convenient),
            "not_convenient" | "not convenient" => Ok(Self::NotConvenient),
            _ => Err(ValidationError::InvalidVariant {
                field: "location",
                value: value.to_owned(),
            }),
        }
    }

    /// Stable key used in the database and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Convenient => "convenient",
            Self::NotConvenient => "not_convenient",
        }
    }

    /// Human-readable label for templates and chart slices.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Convenient => "Convenient",
            Self::NotConvenient => "Not convenient",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

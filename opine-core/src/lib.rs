pub mod charts;
pub mod model;
pub mod rating;
pub mod stats;
pub mod validation;

pub use charts::{render_histogram, render_location_pie, ChartError};
pub use model::{
    Business, BusinessSummary, NewBusiness, NewReview, NewUser, RawReview, Review,
    ReviewWithAuthor, User,
};
pub use rating::{Location, Rating, RatingCategory, RATING_MAX, RATING_MIN};
pub use stats::{BusinessStats, LocationSplit, RatingHistogram};
pub use validation::ValidationError;

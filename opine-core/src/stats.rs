//! Review aggregation
//!
//! Turns a business's stored reviews into the numbers the dashboard
//! plots: one histogram per rating category over the 1-10 scale, and a
//! convenient / not-convenient split with percentages. Aggregation is
//! pure; rendering lives in [`crate::charts`].

use serde::Serialize;

use super::model::Review;
use super::rating::{Location, Rating, RatingCategory, RATING_MAX, RATING_MIN};

/// Number of histogram bins: one per value on the rating scale.
pub const BIN_COUNT: usize = (RATING_MAX - RATING_MIN + 1) as usize;

/// Counts of ratings per value, bins covering 1..=10 inclusive.
///
/// Bin counts always sum to the number of ratings folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingHistogram {
    bins: [u32; BIN_COUNT],
}

impl RatingHistogram {
    pub fn new() -> Self {
        Self {
            bins: [0; BIN_COUNT],
        }
    }

    /// Build a histogram from validated ratings.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let mut histogram = Self::new();
        for rating in ratings {
            histogram.add(rating);
        }
        histogram
    }

    pub fn add(&mut self, rating: Rating) {
        self.bins[(rating.get() - RATING_MIN) as usize] += 1;
    }

    /// Count for one rating value. Values off the scale count nothing.
    pub fn count(&self, value: u8) -> u32 {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            self.bins[(value - RATING_MIN) as usize]
        } else {
            0
        }
    }

    /// `(value, count)` pairs in scale order, for plotting.
    pub fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &count)| (RATING_MIN + i as u8, count))
    }

    /// Total ratings folded in; equals the sum of all bins.
    pub fn total(&self) -> u32 {
        self.bins.iter().sum()
    }

    /// Tallest bin, for chart axis scaling.
    pub fn max_count(&self) -> u32 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for RatingHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient / not-convenient counts with derived percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSplit {
    convenient: u32,
    not_convenient: u32,
}

impl LocationSplit {
    pub fn new() -> Self {
        Self {
            convenient: 0,
            not_convenient: 0,
        }
    }

    pub fn add(&mut self, location: Location) {
        match location {
            Location::Convenient => self.convenient += 1,
            Location::NotConvenient => self.not_convenient += 1,
        }
    }

    pub fn count(&self, location: Location) -> u32 {
        match location {
            Location::Convenient => self.convenient,
            Location::NotConvenient => self.not_convenient,
        }
    }

    pub fn total(&self) -> u32 {
        self.convenient + self.not_convenient
    }

    /// Share of one tag in percent; 0.0 when there is nothing to split.
    pub fn percentage(&self, location: Location) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.count(location)) * 100.0 / f64::from(total)
    }

    /// Non-zero slices as `(tag, count, percentage)`, for the pie chart.
    pub fn slices(&self) -> Vec<(Location, u32, f64)> {
        Location::ALL
            .into_iter()
            .filter(|loc| self.count(*loc) > 0)
            .map(|loc| (loc, self.count(loc), self.percentage(loc)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for LocationSplit {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the dashboard needs for one business.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessStats {
    pub total_reviews: u32,
    place: RatingHistogram,
    price: RatingHistogram,
    installations: RatingHistogram,
    service: RatingHistogram,
    pub location: LocationSplit,
}

impl BusinessStats {
    /// Aggregate a business's reviews.
    ///
    /// An empty slice yields empty histograms and `total_reviews = 0`;
    /// the caller decides to skip the charts in that case.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut stats = Self {
            total_reviews: reviews.len() as u32,
            place: RatingHistogram::new(),
            price: RatingHistogram::new(),
            installations: RatingHistogram::new(),
            service: RatingHistogram::new(),
            location: LocationSplit::new(),
        };

        for review in reviews {
            for category in RatingCategory::ALL {
                stats.histogram_mut(category).add(review.rating(category));
            }
            if let Some(location) = review.location_tag() {
                stats.location.add(location);
            }
        }

        stats
    }

    pub fn histogram(&self, category: RatingCategory) -> &RatingHistogram {
        match category {
            RatingCategory::Place => &self.place,
            RatingCategory::Price => &self.price,
            RatingCategory::Installations => &self.installations,
            RatingCategory::Service => &self.service,
        }
    }

    fn histogram_mut(&mut self, category: RatingCategory) -> &mut RatingHistogram {
        match category {
            RatingCategory::Place => &mut self.place,
            RatingCategory::Price => &mut self.price,
            RatingCategory::Installations => &mut self.installations,
            RatingCategory::Service => &mut self.service,
        }
    }

    pub fn has_reviews(&self) -> bool {
        self.total_reviews > 0
    }
}

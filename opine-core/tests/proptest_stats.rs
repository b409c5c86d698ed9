use opine_core::rating::{Location, Rating};
use opine_core::stats::{LocationSplit, RatingHistogram};
use proptest::prelude::*;

// Strategy to generate in-range rating values
fn arb_rating() -> impl Strategy<Value = Rating> {
    (1u8..=10).prop_map(Rating::new_unchecked)
}

proptest! {
    /// Property: bin counts always sum to the number of ratings folded in
    #[test]
    fn prop_histogram_bins_sum_to_input_len(ratings in prop::collection::vec(arb_rating(), 0..200)) {
        let histogram = RatingHistogram::from_ratings(ratings.clone());

        prop_assert_eq!(histogram.total() as usize, ratings.len());

        let bin_sum: u32 = histogram.entries().map(|(_, count)| count).sum();
        prop_assert_eq!(bin_sum as usize, ratings.len());
    }

    /// Property: each bin counts exactly the occurrences of its value
    #[test]
    fn prop_histogram_bins_match_occurrences(ratings in prop::collection::vec(arb_rating(), 0..200)) {
        let histogram = RatingHistogram::from_ratings(ratings.clone());

        for value in 1u8..=10 {
            let expected = ratings.iter().filter(|r| r.get() == value).count() as u32;
            prop_assert_eq!(histogram.count(value), expected);
        }
    }

    /// Property: the tallest bin never exceeds the total
    #[test]
    fn prop_histogram_max_bounded_by_total(ratings in prop::collection::vec(arb_rating(), 0..200)) {
        let histogram = RatingHistogram::from_ratings(ratings);
        prop_assert!(histogram.max_count() <= histogram.total());
    }

    /// Property: location percentages sum to 100 whenever there is data
    #[test]
    fn prop_location_percentages_sum_to_100(
        convenient in 0u32..500,
        not_convenient in 0u32..500,
    ) {
        prop_assume!(convenient + not_convenient > 0);

        let mut split = LocationSplit::new();
        for _ in 0..convenient {
            split.add(Location::Convenient);
        }
        for _ in 0..not_convenient {
            split.add(Location::NotConvenient);
        }

        let sum = split.percentage(Location::Convenient)
            + split.percentage(Location::NotConvenient);
        prop_assert!((sum - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_single_rating_histogram() {
    let histogram = RatingHistogram::from_ratings([Rating::new_unchecked(7)]);

    assert_eq!(histogram.total(), 1);
    assert_eq!(histogram.count(7), 1);
    assert_eq!(histogram.max_count(), 1);
}

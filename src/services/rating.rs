use rand::Rng;

use crate::services::geo::round_to;

pub const RATING_JITTER: f64 = 0.3;
const DEFAULT_BASE_RATING: f64 = 4.0;

pub fn base_rating(category: &str) -> f64 {
    match category {
        "cafe" => 4.2,
        "restaurant" => 4.3,
        "fast_food" => 3.9,
        "food_court" => 4.0,
        _ => DEFAULT_BASE_RATING,
    }
}

/// Base rating for the category plus uniform jitter, rounded to 1 decimal.
pub fn estimate_rating<R: Rng + ?Sized>(category: &str, rng: &mut R) -> f64 {
    let jitter = rng.gen_range(-RATING_JITTER..=RATING_JITTER);
    round_to(base_rating(category) + jitter, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ratings_stay_within_jitter_of_base() {
        let mut rng = StdRng::seed_from_u64(7);
        for category in ["cafe", "restaurant", "fast_food", "food_court", "bar"] {
            let base = base_rating(category);
            for _ in 0..500 {
                let rating = estimate_rating(category, &mut rng);
                assert!(
                    rating >= base - RATING_JITTER - 1e-9 && rating <= base + RATING_JITTER + 1e-9,
                    "{category}: {rating} outside {base}±{RATING_JITTER}"
                );
                assert_eq!(rating, round_to(rating, 1));
            }
        }
    }

    #[test]
    fn unknown_category_uses_default_base() {
        assert_eq!(base_rating("nightclub"), DEFAULT_BASE_RATING);
        assert_eq!(base_rating(""), DEFAULT_BASE_RATING);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first: Vec<f64> = (0..10).map(|_| estimate_rating("cafe", &mut a)).collect();
        let second: Vec<f64> = (0..10).map(|_| estimate_rating("cafe", &mut b)).collect();
        assert_eq!(first, second);
    }
}

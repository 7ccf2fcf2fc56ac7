pub const DEFAULT_CATEGORY: &str = "restaurant";

/// Maps a mood selector to the amenity category searched upstream.
/// Unknown or empty moods fall back to [`DEFAULT_CATEGORY`].
pub fn category_for_mood(mood: &str) -> &'static str {
    match mood.trim().to_lowercase().as_str() {
        "work" => "cafe",
        "date" => "restaurant",
        "quick" => "fast_food",
        "budget" => "food_court",
        _ => DEFAULT_CATEGORY,
    }
}

pub fn category_label(category: &str) -> &'static str {
    match category {
        "cafe" => "Cafe",
        "restaurant" => "Restaurant",
        "fast_food" => "Fast Food",
        "food_court" => "Food Court",
        _ => "Place",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_moods_map_to_categories() {
        assert_eq!(category_for_mood("work"), "cafe");
        assert_eq!(category_for_mood("date"), "restaurant");
        assert_eq!(category_for_mood("quick"), "fast_food");
        assert_eq!(category_for_mood("budget"), "food_court");
    }

    #[test]
    fn mood_lookup_ignores_case_and_whitespace() {
        assert_eq!(category_for_mood("  Work "), "cafe");
    }

    #[test]
    fn unknown_mood_falls_back() {
        assert_eq!(category_for_mood("party"), DEFAULT_CATEGORY);
        assert_eq!(category_for_mood(""), DEFAULT_CATEGORY);
    }
}

//! Display labels for provider codes shown on result cards.

use super::domain::Candidate;

/// Food categories the search filter understands, with their card labels
pub const FOOD_TYPES: &[(&str, &str)] = &[
    ("restaurant", "餐廳"),
    ("cafe", "咖啡廳"),
    ("bakery", "烘焙店"),
    ("meal_takeaway", "外帶美食"),
    ("food", "食物店"),
];

/// Provider category used when no food type is selected
pub const DEFAULT_CATEGORY: &str = "restaurant";

/// Maximum number of category labels shown per card
const MAX_CARD_TAGS: usize = 2;

pub fn food_type_label(tag: &str) -> Option<&'static str> {
    FOOD_TYPES
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, label)| *label)
}

pub fn is_known_food_type(tag: &str) -> bool {
    food_type_label(tag).is_some()
}

/// Labels for the known category tags of a candidate, in provider order
pub fn card_tags(candidate: &Candidate) -> Vec<&'static str> {
    candidate
        .types
        .iter()
        .filter_map(|t| food_type_label(t))
        .take(MAX_CARD_TAGS)
        .collect()
}

pub fn price_tier_label(tier: u8) -> &'static str {
    match tier {
        0 => "免費",
        1 => "平價 ($)",
        2 => "中等 ($$)",
        3 => "較貴 ($$$)",
        _ => "昂貴 ($$$$)",
    }
}

/// Caption for the 1-4 price selector
pub fn price_level_caption(level: i64) -> &'static str {
    match level {
        1 => "只看平價 ($)",
        2 => "只看中價 ($$)",
        3 => "中價~中高價 ($$~$$$)",
        4 => "中高~高價 ($$$~$$$$)",
        _ => "價格不限",
    }
}

/// Result count line, e.g. "顯示 5 / 12 筆結果"
pub fn search_stats(shown: usize, total: usize) -> String {
    if total != 0 && total != shown {
        format!("顯示 {} / {} 筆結果", shown, total)
    } else {
        format!("找到 {} 筆結果", shown)
    }
}

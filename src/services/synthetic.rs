//! Offline stand-in data used when the places provider cannot answer.
//!
//! Results are clearly fake (ids start with `mock_`, no coordinates) but are
//! realistic enough to drive filtering, ranking and favorites.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{BusinessStatus, Candidate};

/// Prefix of every synthetic place id
pub const MOCK_ID_PREFIX: &str = "mock_";

const RESTAURANT_NAMES: &[&str] = &[
    "小籠包專賣店",
    "日式拉麵館",
    "泰式料理",
    "義式餐廳",
    "韓式燒肉",
    "台式熱炒",
    "港式茶餐廳",
    "越南河粉",
    "美式漢堡",
    "法式甜點店",
    "中式快餐",
    "印度咖哩",
    "墨西哥餐廳",
    "素食餐廳",
    "海鮮餐廳",
];

/// Probability that a synthetic place reports being open
const OPEN_PROBABILITY: f64 = 0.7;

pub fn is_synthetic_id(place_id: &str) -> bool {
    place_id.starts_with(MOCK_ID_PREFIX)
}

/// Generate up to `count` synthetic restaurants around a station
///
/// Output is deterministic per station name so repeated offline searches
/// show the same list.
pub fn generate_candidates(station: &str, count: usize) -> Vec<Candidate> {
    let mut rng = StdRng::seed_from_u64(station_seed(station));

    RESTAURANT_NAMES
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, name)| {
            let rating = (rng.random_range(3.5..=5.0_f64) * 10.0).round() / 10.0;

            Candidate {
                id: format!("{}{}", MOCK_ID_PREFIX, index),
                name: format!("{} ({}店)", name, station),
                coordinates: None,
                rating: Some(rating),
                review_count: Some(rng.random_range(50..550)),
                price_tier: Some(rng.random_range(1..=4)),
                business_status: Some(BusinessStatus::Operational),
                open_now: Some(rng.random_bool(OPEN_PROBABILITY)),
                types: vec!["restaurant".to_string(), "food".to_string()],
                address: Some(format!("台北市 {} 附近", station)),
                photo_url: None,
            }
        })
        .collect()
}

/// FNV-1a over the station name
fn station_seed(station: &str) -> u64 {
    station
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

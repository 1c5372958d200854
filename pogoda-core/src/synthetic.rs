//! Plausible weather generated from the calendar month alone.
//!
//! Used when the live provider is unavailable. Generation never fails; with a
//! seeded RNG and an explicit month it is fully deterministic.

use chrono::{Datelike, Local};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{City, WeatherRecord, round_half_up, round_one_decimal};

pub const SYNTHETIC_CONDITIONS: [&str; 5] =
    ["ясно", "облачно", "пасмурно", "небольшой дождь", "снег"];

pub const SYNTHETIC_ICON_URL: &str = "//cdn.weatherapi.com/weather/64x64/day/113.png";

pub const SYNTHETIC_COUNTRY: &str = "RU";

const BASE_PRESSURE_HPA: f64 = 1013.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Calendar month numbered 1..=12.
    pub fn from_month(month: u32) -> Self {
        Self::from_month0(month.saturating_sub(1))
    }

    /// Month index numbered 0..=11 (0 is January).
    pub fn from_month0(month0: u32) -> Self {
        match month0 {
            2..=4 => Season::Spring,
            5..=7 => Season::Summer,
            8..=10 => Season::Autumn,
            // 11, 0, 1
            _ => Season::Winter,
        }
    }

    /// Inclusive-exclusive Celsius range temperatures are drawn from.
    pub fn temperature_range(&self) -> (f64, f64) {
        match self {
            Season::Winter => (-15.0, 0.0),
            Season::Spring => (5.0, 15.0),
            Season::Summer => (15.0, 25.0),
            Season::Autumn => (0.0, 10.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticWeatherGenerator {
    rng: ChaCha8Rng,
}

impl Default for SyntheticWeatherGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticWeatherGenerator {
    pub fn new() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Generate a record for `city` using the current local month.
    pub fn generate(&mut self, city: &City) -> WeatherRecord {
        self.generate_for_month(city, Local::now().month())
    }

    /// Generate a record for `city` as if it were calendar `month` (1..=12).
    pub fn generate_for_month(&mut self, city: &City, month: u32) -> WeatherRecord {
        let (min, max) = Season::from_month(month).temperature_range();
        let rng = &mut self.rng;

        let temperature_c = round_half_up(rng.gen_range(min..max));
        let feels_like_c = temperature_c - round_half_up(rng.gen_range(0.0..5.0));
        let humidity_pct = round_half_up(rng.gen_range(40.0..80.0)) as u8;
        let pressure_hpa = BASE_PRESSURE_HPA + round_half_up(rng.gen_range(-10.0..10.0));
        let temp_min_c = temperature_c - round_half_up(rng.gen_range(0.0..3.0));
        let temp_max_c = temperature_c + round_half_up(rng.gen_range(0.0..3.0));
        let condition_text = SYNTHETIC_CONDITIONS[rng.gen_range(0..SYNTHETIC_CONDITIONS.len())];
        let wind_speed_ms = round_one_decimal(rng.gen_range(2.0..10.0));

        WeatherRecord {
            location_name: city.name.clone(),
            country_code: SYNTHETIC_COUNTRY.to_string(),
            temperature_c,
            feels_like_c,
            humidity_pct,
            pressure_hpa,
            temp_min_c,
            temp_max_c,
            condition_text: condition_text.to_string(),
            condition_icon_url: SYNTHETIC_ICON_URL.to_string(),
            wind_speed_ms,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Ordered catalog of supported cities. The first entry is the default selection.
pub const CITY_NAMES: [&str; 8] = [
    "Москва",
    "Санкт-Петербург",
    "Новосибирск",
    "Екатеринбург",
    "Казань",
    "Ковров",
    "Владимир",
    "Иваново",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub name: String,
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// All catalog cities, in display order.
    pub fn catalog() -> Vec<City> {
        CITY_NAMES.iter().map(|name| City::new(*name)).collect()
    }

    pub fn default_city() -> City {
        City::new(CITY_NAMES[0])
    }

    /// Resolve user input to a catalog city: either a 1-based index or a
    /// case-insensitive exact name.
    pub fn lookup(input: &str) -> anyhow::Result<City> {
        let trimmed = input.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| CITY_NAMES.get(i))
                .map(|name| City::new(*name))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "City index {index} is out of range (1..={}).",
                        CITY_NAMES.len()
                    )
                });
        }

        let wanted = trimmed.to_lowercase();
        CITY_NAMES
            .iter()
            .find(|name| name.to_lowercase() == wanted)
            .map(|name| City::new(*name))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown city '{input}'. Supported cities: {}.",
                    CITY_NAMES.join(", ")
                )
            })
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The single weather shape handed to presentation, whether it came from the
/// provider or from the synthetic generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition_text: String,
    pub condition_icon_url: String,
    /// Metres per second, already rounded to one decimal place.
    pub wind_speed_ms: f64,
}

impl WeatherRecord {
    /// Wind speed with exactly one decimal place, e.g. `"10.0"`.
    pub fn wind_speed_display(&self) -> String {
        format!("{:.1}", self.wind_speed_ms)
    }
}

/// Outcome of one acquisition cycle. Both variants carry a record to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcquisitionResult {
    Success(WeatherRecord),
    Failure { message: String, fallback: WeatherRecord },
}

impl AcquisitionResult {
    pub fn record(&self) -> &WeatherRecord {
        match self {
            AcquisitionResult::Success(record) => record,
            AcquisitionResult::Failure { fallback, .. } => fallback,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AcquisitionResult::Success(_) => None,
            AcquisitionResult::Failure { message, .. } => Some(message.as_str()),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, AcquisitionResult::Failure { .. })
    }
}

/// What the presentation shell observes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub city: City,
    pub loading: bool,
    pub error: Option<String>,
    pub weather: Option<WeatherRecord>,
    /// Generation of the request that last wrote this state.
    pub generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            city: City::default_city(),
            loading: false,
            error: None,
            weather: None,
            generation: 0,
        }
    }
}

/// Round half up: `x.5` always goes toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

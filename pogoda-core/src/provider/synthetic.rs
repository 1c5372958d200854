use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::{
    City, WeatherRecord, error::FetchError, provider::WeatherSource,
    synthetic::SyntheticWeatherGenerator,
};

/// Pause before a synthetic record is returned, so the loading state looks
/// the same as on the live path.
pub const DEFAULT_SYNTHETIC_DELAY: Duration = Duration::from_millis(500);

/// [`WeatherSource`] backed by the synthetic generator. Never fails.
#[derive(Debug)]
pub struct SyntheticSource {
    generator: Mutex<SyntheticWeatherGenerator>,
    delay: Duration,
    month: Option<u32>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            generator: Mutex::new(SyntheticWeatherGenerator::new()),
            delay: DEFAULT_SYNTHETIC_DELAY,
            month: None,
        }
    }

    /// Deterministic source with no delay.
    pub fn seeded(seed: u64) -> Self {
        Self {
            generator: Mutex::new(SyntheticWeatherGenerator::seeded(seed)),
            delay: Duration::ZERO,
            month: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Pin the calendar month instead of reading the clock.
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub async fn generate(&self, city: &City) -> WeatherRecord {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut generator = self.generator.lock().await;
        match self.month {
            Some(month) => generator.generate_for_month(city, month),
            None => generator.generate(city),
        }
    }
}

#[async_trait]
impl WeatherSource for SyntheticSource {
    async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError> {
        Ok(self.generate(city).await)
    }
}

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{City, WeatherRecord, error::FetchError};

pub mod synthetic;
pub mod weatherapi;

pub use synthetic::SyntheticSource;
pub use weatherapi::WeatherApiSource;

/// Anything that can produce the current weather for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn sources_are_usable_as_trait_objects() {
        let sources: Vec<Arc<dyn WeatherSource>> = vec![
            Arc::new(SyntheticSource::seeded(3).with_month(1)),
            Arc::new(WeatherApiSource::new(String::new()).with_base_url("http://127.0.0.1:1")),
        ];

        let city = City::default_city();
        let synthetic = sources[0].fetch(&city).await.expect("synthetic never fails");
        assert_eq!(synthetic.location_name, city.name);

        let live = sources[1].fetch(&city).await;
        assert!(matches!(live, Err(FetchError::Transport(_))));
    }
}

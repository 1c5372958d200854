//! Live fetch with synthetic fallback, and the view state it drives.
//!
//! Every `select_city`/`retry` bumps the generation stored in the view state.
//! A cycle commits its result only if no newer cycle has started since, so the
//! last request always wins regardless of completion order. Both the bump and
//! the check run under the `watch` channel's lock.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    City, Config,
    model::{AcquisitionResult, ViewState},
    provider::{SyntheticSource, WeatherApiSource, WeatherSource},
};

#[derive(Debug)]
pub struct WeatherAcquisitionFlow {
    live: Arc<dyn WeatherSource>,
    fallback: SyntheticSource,
    state: watch::Sender<ViewState>,
}

impl WeatherAcquisitionFlow {
    pub fn new(live: Arc<dyn WeatherSource>, fallback: SyntheticSource) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            live,
            fallback,
            state,
        }
    }

    /// Wire a live WeatherAPI source and a synthetic fallback from config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let live = WeatherApiSource::from_config(config)?;
        let fallback = SyntheticSource::new().with_delay(config.synthetic_delay());
        Ok(Self::new(Arc::new(live), fallback))
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub async fn select_city(&self, city: City) -> AcquisitionResult {
        self.acquire(city).await
    }

    /// Re-run acquisition for the currently selected city.
    pub async fn retry(&self) -> AcquisitionResult {
        let city = self.state.borrow().city.clone();
        self.acquire(city).await
    }

    /// One full cycle: Fetching, then Success or Failed.
    ///
    /// The result is always returned to the caller, but only written to the
    /// view state if this is still the newest cycle.
    pub async fn acquire(&self, city: City) -> AcquisitionResult {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.city = city.clone();
            s.loading = true;
            s.error = None;
        });
        tracing::info!(city = %city, generation, "Fetching weather");

        let result = match self.live.fetch(&city).await {
            Ok(record) => AcquisitionResult::Success(record),
            Err(err) => {
                tracing::warn!(city = %city, error = %err, "Live fetch failed, using synthetic data");
                let fallback = self.fallback.generate(&city).await;
                AcquisitionResult::Failure {
                    message: err.user_message(),
                    fallback,
                }
            }
        };

        self.commit(generation, &result);
        result
    }

    fn commit(&self, generation: u64, result: &AcquisitionResult) {
        let committed = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.loading = false;
            s.error = result.error().map(str::to_owned);
            s.weather = Some(result.record().clone());
            true
        });

        if !committed {
            tracing::debug!(generation, "Discarding stale weather result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WeatherRecord, error::FetchError};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug)]
    struct AlwaysFails;

    #[async_trait]
    impl WeatherSource for AlwaysFails {
        async fn fetch(&self, _city: &City) -> Result<WeatherRecord, FetchError> {
            Err(FetchError::http_status(StatusCode::SERVICE_UNAVAILABLE, None))
        }
    }

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl WeatherSource for Echo {
        async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError> {
            let mut record = SyntheticSource::seeded(0).generate(city).await;
            record.country_code = "Россия".into();
            Ok(record)
        }
    }

    #[tokio::test]
    async fn fallback_is_total_for_every_city() {
        let flow = WeatherAcquisitionFlow::new(Arc::new(AlwaysFails), SyntheticSource::seeded(1));

        for city in City::catalog() {
            let result = flow.select_city(city.clone()).await;
            assert!(result.is_synthetic());
            assert_eq!(result.record().location_name, city.name);
            assert_eq!(result.error(), Some("Ошибка 503: Service Unavailable"));

            let state = flow.state();
            assert!(!state.loading);
            assert_eq!(state.weather.as_ref(), Some(result.record()));
        }
    }

    /// Fails until switched on.
    #[derive(Debug, Default)]
    struct Flaky {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl WeatherSource for Flaky {
        async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError> {
            if self.healthy.load(Ordering::SeqCst) {
                Echo.fetch(city).await
            } else {
                AlwaysFails.fetch(city).await
            }
        }
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let source = Arc::new(Flaky::default());
        let flow = WeatherAcquisitionFlow::new(source.clone(), SyntheticSource::seeded(1));

        flow.select_city(City::new("Казань")).await;
        assert!(flow.state().error.is_some());
        assert_eq!(flow.state().weather.map(|w| w.country_code), Some("RU".to_string()));

        source.healthy.store(true, Ordering::SeqCst);
        let result = flow.retry().await;
        assert_eq!(result.error(), None);

        let state = flow.state();
        assert_eq!(state.error, None);
        assert_eq!(state.city.name, "Казань");
        assert_eq!(state.weather.map(|w| w.country_code), Some("Россия".to_string()));
    }

    #[tokio::test]
    async fn retry_uses_current_city() {
        let flow = WeatherAcquisitionFlow::new(Arc::new(Echo), SyntheticSource::seeded(1));

        let first = flow.retry().await;
        assert_eq!(first.record().location_name, "Москва");

        flow.select_city(City::new("Иваново")).await;
        let again = flow.retry().await;
        assert_eq!(again.record().location_name, "Иваново");
        assert_eq!(flow.state().generation, 3);
    }

    /// Holds each city's fetch until its gate is opened.
    #[derive(Debug, Default)]
    struct Gated {
        moscow: Notify,
        vladimir: Notify,
    }

    #[async_trait]
    impl WeatherSource for Gated {
        async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError> {
            match city.name.as_str() {
                "Москва" => self.moscow.notified().await,
                _ => self.vladimir.notified().await,
            }
            Echo.fetch(city).await
        }
    }

    #[tokio::test]
    async fn earlier_request_finishing_first_does_not_touch_newer_state() {
        let source = Arc::new(Gated::default());
        let flow = WeatherAcquisitionFlow::new(source.clone(), SyntheticSource::seeded(1));
        let (a_done, a_finished) = tokio::sync::oneshot::channel();

        let a = async {
            let result = flow.select_city(City::new("Москва")).await;
            let _ = a_done.send(());
            result
        };
        let b = flow.select_city(City::new("Владимир"));
        let driver = async {
            source.moscow.notify_one();
            a_finished.await.expect("first request completes");

            let state = flow.state();
            assert!(state.loading);
            assert_eq!(state.city.name, "Владимир");
            assert_eq!(state.generation, 2);
            assert!(state.weather.is_none());

            source.vladimir.notify_one();
        };

        let (a, b, ()) = tokio::join!(a, b, driver);
        assert_eq!(a.record().location_name, "Москва");
        assert_eq!(b.record().location_name, "Владимир");

        let state = flow.state();
        assert!(!state.loading);
        assert_eq!(state.city.name, "Владимир");
        assert_eq!(state.weather.map(|w| w.location_name), Some("Владимир".to_string()));

        // Retry follows the newest selection, not the request that finished last.
        source.vladimir.notify_one();
        assert_eq!(flow.retry().await.record().location_name, "Владимир");
    }

    #[tokio::test]
    async fn subscribers_see_committed_result() {
        let flow = WeatherAcquisitionFlow::new(Arc::new(AlwaysFails), SyntheticSource::seeded(1));
        let rx = flow.subscribe();
        assert!(rx.borrow().weather.is_none());

        flow.select_city(City::new("Ковров")).await;

        let seen = rx.borrow().clone();
        assert!(!seen.loading);
        assert_eq!(seen.city.name, "Ковров");
        assert!(seen.error.is_some());
    }
}

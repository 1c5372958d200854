//! Core library for the `pogoda` CLI.
//!
//! This crate defines:
//! - The city catalog and the canonical weather record
//! - Normalization of WeatherAPI.com payloads
//! - A synthetic weather generator used as a fallback
//! - The acquisition flow: live fetch, error classification, synthetic
//!   substitution, and last-request-wins view state
//! - Configuration & credentials handling
//!
//! It is used by `pogoda-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod flow;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod synthetic;

pub use config::Config;
pub use error::FetchError;
pub use flow::WeatherAcquisitionFlow;
pub use model::{AcquisitionResult, City, ViewState, WeatherRecord};
pub use provider::{SyntheticSource, WeatherApiSource, WeatherSource};
pub use synthetic::{Season, SyntheticWeatherGenerator};

//! Mapping from the weatherapi.com `current.json` payload to [`WeatherRecord`].
//!
//! Every payload field is optional on the wire so that a missing one can be
//! reported by name instead of as a generic deserialization failure.

use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{WeatherRecord, round_one_decimal},
};

/// The provider supplies no min/max for current conditions, so the record
/// carries `temp_c` plus/minus this band. Approximation, not measured data.
pub const TEMP_BAND_C: f64 = 2.0;

const KPH_PER_MS: f64 = 3.6;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderPayload {
    #[serde(default)]
    pub location: Option<WaLocation>,
    #[serde(default)]
    pub current: Option<WaCurrent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WaLocation {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WaCondition {
    pub text: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WaCurrent {
    pub temp_c: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub humidity: Option<u8>,
    pub pressure_mb: Option<f64>,
    pub wind_kph: Option<f64>,
    pub condition: Option<WaCondition>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct WaErrorBody {
    pub error: Option<WaErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaErrorDetail {
    pub message: Option<String>,
}

/// Extract `error.message` from a provider error body, if there is one.
pub(crate) fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
}

pub fn parse_payload(body: &str) -> Result<ProviderPayload, FetchError> {
    Ok(serde_json::from_str(body)?)
}

pub fn normalize(payload: &ProviderPayload) -> Result<WeatherRecord, FetchError> {
    let location = required(payload.location.as_ref(), "location")?;
    let current = required(payload.current.as_ref(), "current")?;
    let condition = required(current.condition.as_ref(), "current.condition")?;

    let temperature_c = finite(current.temp_c, "current.temp_c")?;
    let wind_kph = finite(current.wind_kph, "current.wind_kph")?;

    Ok(WeatherRecord {
        location_name: required(location.name.clone(), "location.name")?,
        country_code: required(location.country.clone(), "location.country")?,
        temperature_c,
        feels_like_c: finite(current.feelslike_c, "current.feelslike_c")?,
        humidity_pct: required(current.humidity, "current.humidity")?,
        pressure_hpa: finite(current.pressure_mb, "current.pressure_mb")?,
        temp_min_c: temperature_c - TEMP_BAND_C,
        temp_max_c: temperature_c + TEMP_BAND_C,
        condition_text: required(condition.text.clone(), "current.condition.text")?,
        condition_icon_url: required(condition.icon.clone(), "current.condition.icon")?,
        wind_speed_ms: round_one_decimal(wind_kph / KPH_PER_MS),
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, FetchError> {
    value.ok_or_else(|| FetchError::MalformedPayload(format!("missing field `{field}`")))
}

fn finite(value: Option<f64>, field: &str) -> Result<f64, FetchError> {
    let v = required(value, field)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FetchError::MalformedPayload(format!("non-finite value in `{field}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: &str = r#"{
        "location": { "name": "Москва", "country": "Россия", "localtime_epoch": 1763460000 },
        "current": {
            "temp_c": -3.4,
            "feelslike_c": -7.9,
            "humidity": 86,
            "pressure_mb": 1021.0,
            "wind_kph": 36.0,
            "condition": { "text": "Пасмурно", "icon": "//cdn.weatherapi.com/weather/64x64/day/122.png", "code": 1009 }
        }
    }"#;

    #[test]
    fn maps_every_field() {
        let payload = parse_payload(MOSCOW).unwrap();
        let record = normalize(&payload).unwrap();

        assert_eq!(record.location_name, "Москва");
        assert_eq!(record.country_code, "Россия");
        assert_eq!(record.temperature_c, -3.4);
        assert_eq!(record.feels_like_c, -7.9);
        assert_eq!(record.humidity_pct, 86);
        assert_eq!(record.pressure_hpa, 1021.0);
        assert_eq!(record.temp_min_c, -3.4 - 2.0);
        assert_eq!(record.temp_max_c, -3.4 + 2.0);
        assert_eq!(record.condition_text, "Пасмурно");
        assert_eq!(record.condition_icon_url, "//cdn.weatherapi.com/weather/64x64/day/122.png");
    }

    #[test]
    fn wind_kph_converts_to_ms_with_one_decimal() {
        let payload = parse_payload(MOSCOW).unwrap();
        let record = normalize(&payload).unwrap();
        assert_eq!(record.wind_speed_display(), "10.0");

        let mut payload = payload;
        if let Some(current) = payload.current.as_mut() {
            current.wind_kph = Some(13.0);
        }
        assert_eq!(normalize(&payload).unwrap().wind_speed_display(), "3.6");
    }

    #[test]
    fn normalize_is_idempotent() {
        let payload = parse_payload(MOSCOW).unwrap();
        assert_eq!(normalize(&payload).unwrap(), normalize(&payload).unwrap());
    }

    #[test]
    fn missing_nested_field_is_malformed() {
        let body = r#"{
            "location": { "name": "Казань", "country": "Россия" },
            "current": { "temp_c": 1.0, "feelslike_c": 0.0, "humidity": 70,
                         "wind_kph": 5.0, "condition": { "text": "Ясно", "icon": "x" } }
        }"#;
        let payload = parse_payload(body).unwrap();

        match normalize(&payload) {
            Err(FetchError::MalformedPayload(msg)) => assert!(msg.contains("current.pressure_mb")),
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn missing_section_is_malformed() {
        let payload = parse_payload(r#"{ "location": { "name": "Казань" } }"#).unwrap();
        let err = normalize(&payload).unwrap_err();
        assert!(err.to_string().contains("current"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            parse_payload("<html>oops</html>"),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let mut payload = parse_payload(MOSCOW).unwrap();
        if let Some(current) = payload.current.as_mut() {
            current.temp_c = Some(f64::NAN);
        }
        assert!(matches!(normalize(&payload), Err(FetchError::MalformedPayload(_))));
    }

    #[test]
    fn provider_error_message_extraction() {
        assert_eq!(
            provider_error_message(r#"{"error":{"code":2006,"message":"Invalid API key"}}"#),
            Some("Invalid API key".to_string())
        );
        assert_eq!(provider_error_message(r#"{"error":{}}"#), None);
        assert_eq!(provider_error_message("not json"), None);
    }
}

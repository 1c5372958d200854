use std::fmt::Write as _;

use chrono::{DateTime, Local};
use pogoda_core::{AcquisitionResult, City, WeatherRecord};

pub fn loading_line(city: &City) -> String {
    format!("Загружаем погоду для {city}...")
}

pub fn cities(catalog: &[City]) -> String {
    catalog
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{:>2}. {city}\n", i + 1))
        .collect()
}

pub fn record(record: &WeatherRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", record.location_name, record.country_code);
    let _ = writeln!(out, "  {}", record.condition_text);
    let _ = writeln!(
        out,
        "  Температура:   {}°C (ощущается как {}°C)",
        record.temperature_c, record.feels_like_c
    );
    let _ = writeln!(
        out,
        "  Мин / макс:    {}°C / {}°C",
        record.temp_min_c, record.temp_max_c
    );
    let _ = writeln!(out, "  Влажность:     {}%", record.humidity_pct);
    let _ = writeln!(out, "  Давление:      {} гПа", record.pressure_hpa);
    let _ = writeln!(out, "  Ветер:         {} м/с", record.wind_speed_display());
    let _ = writeln!(out, "  Иконка:        https:{}", record.condition_icon_url);
    out
}

/// Full screen for one finished request: error banner, record, footer.
pub fn result(result: &AcquisitionResult, updated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    if let Some(message) = result.error() {
        let _ = writeln!(out, "Ой! Не удалось загрузить погоду: {message}");
        let _ = writeln!(out, "Проверьте соединение с интернетом или попробуйте снова.");
        let _ = writeln!(out, "Показаны демо-данные.");
        out.push('\n');
    }

    out.push_str(&record(result.record()));
    out.push('\n');

    let source = if result.is_synthetic() { "демо-данные" } else { "WeatherAPI.com" };
    let _ = writeln!(
        out,
        "Данные: {source} • Последнее обновление: {}",
        updated_at.format("%H:%M:%S")
    );
    out
}

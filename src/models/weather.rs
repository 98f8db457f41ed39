use chrono::NaiveDate;
use serde::Serialize;

use super::trip::Coordinates;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub mean_temperature: f64,
    /// `None` when no hour of the day reported a code.
    pub weather_code: Option<u8>,
    pub condition: Option<&'static str>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Forecast {
    pub coordinates: Coordinates,
    pub days: Vec<DailyWeather>,
}

/// Human readable label for a WMO weather interpretation code.
pub fn condition_label(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snowfall",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

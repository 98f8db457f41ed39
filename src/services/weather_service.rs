//! Daily forecast built from Open-Meteo's hourly readings.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::{PlannerError, Result};
use crate::models::trip::Coordinates;
use crate::models::weather::{condition_label, DailyWeather, Forecast};

const SERVICE: &str = "weather service";
pub const MAX_FORECAST_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyReadings,
}

#[derive(Debug, Deserialize)]
pub struct HourlyReadings {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub weathercode: Vec<Option<u8>>,
}

pub struct WeatherService {
    http_client: Client,
    config: WeatherConfig,
}

impl WeatherService {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlannerError::Config(format!("failed to build weather client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Forecast for `days` days from `start`, clamped to 1..=7.
    pub async fn forecast(
        &self,
        coordinates: Coordinates,
        start: NaiveDate,
        days: u32,
    ) -> Result<Forecast> {
        let span = forecast_span(days);
        let end = start + Duration::days(i64::from(span) - 1);
        let url = format!("{}/v1/forecast", self.config.base_url);
        debug!(
            "Fetching forecast for ({:.4}, {:.4}) from {} to {}",
            coordinates.latitude, coordinates.longitude, start, end
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("hourly", "temperature_2m,weathercode".to_string()),
                ("timezone", "auto".to_string()),
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::from_status(SERVICE, status, &body));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        Ok(Forecast {
            coordinates,
            days: aggregate_daily(&body.hourly),
        })
    }
}

pub fn forecast_span(days: u32) -> u32 {
    days.clamp(1, MAX_FORECAST_DAYS)
}

#[derive(Default)]
struct DayAccumulator {
    temperatures: Vec<f64>,
    codes: BTreeMap<u8, usize>,
}

/// Groups hourly readings by calendar day. The day's condition is its most
/// frequent weather code, the more severe (higher) code winning a tie.
pub fn aggregate_daily(hourly: &HourlyReadings) -> Vec<DailyWeather> {
    let mut by_day: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for (i, time) in hourly.time.iter().enumerate() {
        let Some(date) = time
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        let day = by_day.entry(date).or_default();
        if let Some(Some(temperature)) = hourly.temperature_2m.get(i) {
            day.temperatures.push(*temperature);
        }
        if let Some(Some(code)) = hourly.weathercode.get(i) {
            *day.codes.entry(*code).or_default() += 1;
        }
    }

    by_day
        .into_iter()
        .filter(|(_, day)| !day.temperatures.is_empty())
        .map(|(date, day)| {
            let min = day.temperatures.iter().copied().fold(f64::INFINITY, f64::min);
            let max = day
                .temperatures
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let mean = day.temperatures.iter().sum::<f64>() / day.temperatures.len() as f64;
            // max_by_key keeps the last maximum, and BTreeMap iterates codes
            // in ascending order.
            let code = day
                .codes
                .iter()
                .max_by_key(|(_, count)| **count)
                .map(|(code, _)| *code);

            DailyWeather {
                date,
                min_temperature: min,
                max_temperature: max,
                mean_temperature: (mean * 10.0).round() / 10.0,
                weather_code: code,
                condition: code.map(condition_label),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(entries: &[(&str, f64, u8)]) -> HourlyReadings {
        HourlyReadings {
            time: entries.iter().map(|(t, _, _)| t.to_string()).collect(),
            temperature_2m: entries.iter().map(|(_, t, _)| Some(*t)).collect(),
            weathercode: entries.iter().map(|(_, _, c)| Some(*c)).collect(),
        }
    }

    #[test]
    fn test_daily_min_max_mean() {
        let days = aggregate_daily(&readings(&[
            ("2025-05-01T00:00", 10.0, 0),
            ("2025-05-01T12:00", 20.0, 0),
            ("2025-05-01T18:00", 15.0, 3),
            ("2025-05-02T00:00", 8.0, 61),
            ("2025-05-02T12:00", 9.0, 61),
        ]));

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(days[0].min_temperature, 10.0);
        assert_eq!(days[0].max_temperature, 20.0);
        assert_eq!(days[0].mean_temperature, 15.0);
        assert_eq!(days[0].condition, Some("Clear sky"));
        assert_eq!(days[1].condition, Some("Rain"));
        assert_eq!(days[1].mean_temperature, 8.5);
    }

    #[test]
    fn test_tie_prefers_more_severe_code() {
        let days = aggregate_daily(&readings(&[
            ("2025-05-01T00:00", 10.0, 95),
            ("2025-05-01T01:00", 10.0, 1),
        ]));
        assert_eq!(days[0].weather_code, Some(95));
        assert_eq!(days[0].condition, Some("Thunderstorm"));
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let hourly = HourlyReadings {
            time: vec!["2025-05-01T00:00".into(), "2025-05-01T01:00".into(), "garbage".into()],
            temperature_2m: vec![None, Some(12.0), Some(99.0)],
            weathercode: vec![Some(2), None, Some(0)],
        };
        let days = aggregate_daily(&hourly);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temperature, 12.0);
        assert_eq!(days[0].weather_code, Some(2));
    }

    #[test]
    fn test_day_without_codes_has_no_condition() {
        let hourly = HourlyReadings {
            time: vec!["2025-05-01T00:00".into(), "2025-05-01T06:00".into()],
            temperature_2m: vec![Some(10.0), Some(14.0)],
            weathercode: vec![None, None],
        };
        let days = aggregate_daily(&hourly);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].mean_temperature, 12.0);
        assert_eq!(days[0].weather_code, None);
        assert_eq!(days[0].condition, None);
    }

    #[test]
    fn test_forecast_span_is_clamped() {
        assert_eq!(forecast_span(0), 1);
        assert_eq!(forecast_span(3), 3);
        assert_eq!(forecast_span(30), 7);
    }
}

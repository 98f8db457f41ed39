use std::{env, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";
const DEFAULT_IMAGE_BASE_URL: &str = "https://api.unsplash.com";
const DEFAULT_SCHEDULE_DAY_CAP: usize = 5;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;

/// Language used for prompts and for the labels the schedule parser looks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

impl FromStr for Language {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ja" | "japanese" => Ok(Language::Japanese),
            other => Err(PlannerError::Config(format!("unsupported language '{}'", other))),
        }
    }
}

/// How parsed schedule blocks are mapped onto calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMatching {
    /// The i-th generated block is the i-th day of the trip.
    #[default]
    Positional,
    /// Blocks whose date label names a day of the trip land on that day,
    /// the rest fill the remaining days in order.
    DateLabel,
}

impl FromStr for DayMatching {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(DayMatching::Positional),
            "date_label" | "date-label" => Ok(DayMatching::DateLabel),
            other => Err(PlannerError::Config(format!(
                "unsupported schedule day matching '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    pub base_url: String,
    pub access_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub language: Language,
    pub schedule_day_cap: usize,
    pub day_matching: DayMatching,
    pub reference_urls: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            schedule_day_cap: DEFAULT_SCHEDULE_DAY_CAP,
            day_matching: DayMatching::default(),
            reference_urls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `None` disables expiry.
    pub idle_ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub geocoder: GeocoderConfig,
    pub weather: WeatherConfig,
    pub images: ImageSearchConfig,
    pub planner: PlannerConfig,
    pub sessions: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys fall
    /// back to defaults, set but unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let server = ServerConfig {
            host: string_or("HOST", HOST),
            port: parse_or(&get, "PORT", PORT)?,
        };

        let llm = LlmConfig {
            api_key: get("OPENAI_API_KEY"),
            base_url: trim_base(string_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL)),
            model: string_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            temperature: parse_or(&get, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            timeout: Duration::from_secs(parse_or(&get, "LLM_TIMEOUT_SECS", 60)?),
        };

        let geocoder = GeocoderConfig {
            base_url: trim_base(string_or("GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL)),
            user_agent: string_or("GEOCODER_USER_AGENT", env!("CARGO_PKG_NAME")),
            timeout: Duration::from_secs(parse_or(&get, "GEOCODER_TIMEOUT_SECS", 10)?),
            max_attempts: parse_or(&get, "GEOCODER_MAX_ATTEMPTS", 3u32)?.max(1),
            retry_delay: Duration::from_millis(parse_or(&get, "GEOCODER_RETRY_DELAY_MS", 1000)?),
        };

        let weather = WeatherConfig {
            base_url: trim_base(string_or("WEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL)),
            timeout: Duration::from_secs(parse_or(&get, "WEATHER_TIMEOUT_SECS", 10)?),
        };

        let images = ImageSearchConfig {
            base_url: trim_base(string_or("IMAGE_SEARCH_BASE_URL", DEFAULT_IMAGE_BASE_URL)),
            access_key: get("IMAGE_SEARCH_ACCESS_KEY"),
            timeout: Duration::from_secs(parse_or(&get, "IMAGE_SEARCH_TIMEOUT_SECS", 10)?),
        };

        let schedule_day_cap: usize =
            parse_or(&get, "SCHEDULE_DAY_CAP", DEFAULT_SCHEDULE_DAY_CAP)?;
        if schedule_day_cap == 0 {
            return Err(PlannerError::Config(
                "SCHEDULE_DAY_CAP must be at least 1".to_string(),
            ));
        }

        let planner = PlannerConfig {
            language: parse_or(&get, "PLANNER_LANGUAGE", Language::English)?,
            schedule_day_cap,
            day_matching: parse_or(&get, "SCHEDULE_DAY_MATCHING", DayMatching::Positional)?,
            reference_urls: get("CHAT_REFERENCE_URLS")
                .map(|urls| {
                    urls.split(',')
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        let idle_secs: u64 =
            parse_or(&get, "SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)?;
        let sessions = SessionConfig {
            idle_ttl: (idle_secs > 0).then(|| Duration::from_secs(idle_secs)),
        };

        Ok(Self {
            server,
            llm,
            geocoder,
            weather,
            images,
            planner,
            sessions,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| PlannerError::Config(format!("{} has an invalid value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::error::{PlannerError, Result};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TravelPurpose {
    #[default]
    Sightseeing,
    Business,
}

impl TravelPurpose {
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (TravelPurpose::Sightseeing, Language::English) => "sightseeing",
            (TravelPurpose::Business, Language::English) => "business",
            (TravelPurpose::Sightseeing, Language::Japanese) => "観光",
            (TravelPurpose::Business, Language::Japanese) => "出張",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Season::Spring, Language::English) => "spring",
            (Season::Summer, Language::English) => "summer",
            (Season::Autumn, Language::English) => "autumn",
            (Season::Winter, Language::English) => "winter",
            (Season::Spring, Language::Japanese) => "春",
            (Season::Summer, Language::Japanese) => "夏",
            (Season::Autumn, Language::Japanese) => "秋",
            (Season::Winter, Language::Japanese) => "冬",
        }
    }
}

/// Everything the user configures about a trip. Every generated section is
/// derived from these values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripParameters {
    pub destination: String,
    #[serde(default)]
    pub purpose: TravelPurpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: u64,
    pub travelers: u32,
}

impl TripParameters {
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlannerError::InvalidInput(
                "destination must not be empty".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(PlannerError::InvalidInput(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.budget == 0 {
            return Err(PlannerError::InvalidInput(
                "budget must be greater than zero".to_string(),
            ));
        }
        if self.travelers == 0 {
            return Err(PlannerError::InvalidInput(
                "there must be at least one traveler".to_string(),
            ));
        }
        Ok(())
    }

    /// Trims free-text fields and drops a blank home location.
    pub fn normalized(mut self) -> Self {
        self.destination = self.destination.trim().to_string();
        self.home_location = self
            .home_location
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        self
    }

    pub fn day_count(&self) -> u32 {
        (self.end_date - self.start_date).num_days().max(0) as u32
    }

    /// Day count for operations that only make sense on a trip of at least
    /// one day.
    pub fn require_days(&self) -> Result<u32> {
        match self.day_count() {
            0 => Err(PlannerError::NotReady(
                "the trip must end at least one day after it starts".to_string(),
            )),
            days => Ok(days),
        }
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.start_date.month())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

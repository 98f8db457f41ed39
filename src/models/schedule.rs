use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the itinerary as shown to (and edited by) the user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: u32,
    pub date: NaiveDate,
    pub label: String,
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

impl DaySchedule {
    pub fn empty(day: u32, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            label: date.format("%m/%d").to_string(),
            morning: String::new(),
            afternoon: String::new(),
            evening: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }

    pub fn apply(&mut self, edit: DayEdit) {
        if let Some(morning) = edit.morning {
            self.morning = morning;
        }
        if let Some(afternoon) = edit.afternoon {
            self.afternoon = afternoon;
        }
        if let Some(evening) = edit.evening {
            self.evening = evening;
        }
    }
}

/// A user edit to one day. Absent fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DayEdit {
    pub morning: Option<String>,
    pub afternoon: Option<String>,
    pub evening: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct GeneratedSchedule {
    /// Number of day blocks the model produced (after the cap).
    pub generated_days: usize,
    pub days: Vec<DaySchedule>,
}

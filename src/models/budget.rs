use serde::{Deserialize, Serialize};

use super::trip::TripParameters;

/// Planned spend per category. Categories are not forced to add up to the
/// total budget.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetBreakdown {
    pub transport: u64,
    pub lodging: u64,
    pub food: u64,
    pub activities: u64,
    pub shopping: u64,
}

impl BudgetBreakdown {
    /// Starting split offered before the user enters their own figures.
    pub fn suggested(budget: u64) -> Self {
        Self {
            transport: budget / 4,
            lodging: budget / 3,
            food: budget / 4,
            activities: budget / 6,
            shopping: budget / 12,
        }
    }

    /// Widened so that five `u64` categories can never overflow.
    pub fn total(&self) -> u128 {
        [
            self.transport,
            self.lodging,
            self.food,
            self.activities,
            self.shopping,
        ]
        .into_iter()
        .map(u128::from)
        .sum()
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BudgetSummary {
    pub total_budget: u64,
    pub travelers: u32,
    pub day_count: u32,
    pub per_person: u64,
    /// Absent for a trip that starts and ends on the same day.
    pub per_day: Option<u64>,
    pub breakdown: BudgetBreakdown,
    pub planned: u128,
    pub remaining: i128,
    /// Present exactly when `remaining` is negative.
    pub overage: Option<u128>,
}

impl BudgetSummary {
    pub fn new(trip: &TripParameters, breakdown: BudgetBreakdown) -> Self {
        let day_count = trip.day_count();
        let planned = breakdown.total();
        let remaining = i128::from(trip.budget) - planned as i128;

        Self {
            total_budget: trip.budget,
            travelers: trip.travelers,
            day_count,
            per_person: trip.budget / u64::from(trip.travelers.max(1)),
            per_day: (day_count > 0).then(|| trip.budget / u64::from(day_count)),
            breakdown,
            planned,
            remaining,
            overage: (remaining < 0).then(|| remaining.unsigned_abs()),
        }
    }
}

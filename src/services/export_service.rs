use crate::config::Language;
use crate::models::budget::BudgetSummary;
use crate::services::session_store::PlannerSession;

/// A downloadable Markdown rendering of a session's plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPlan {
    pub file_name: String,
    pub content: String,
}

struct ExportText {
    title: &'static str,
    period: &'static str,
    days: &'static str,
    travelers: &'static str,
    total_budget: &'static str,
    schedule: &'static str,
    morning: &'static str,
    afternoon: &'static str,
    evening: &'static str,
    no_schedule: &'static str,
    packing: &'static str,
    no_packing: &'static str,
    budget: &'static str,
    per_person: &'static str,
    per_day: &'static str,
}

const ENGLISH: ExportText = ExportText {
    title: "Travel plan",
    period: "Period",
    days: "days",
    travelers: "Travelers",
    total_budget: "Total budget",
    schedule: "Schedule",
    morning: "Morning",
    afternoon: "Afternoon",
    evening: "Evening",
    no_schedule: "The schedule has not been created yet.",
    packing: "Packing list",
    no_packing: "The packing list has not been generated yet.",
    budget: "Budget summary",
    per_person: "Per person",
    per_day: "Per day",
};

const JAPANESE: ExportText = ExportText {
    title: "旅行プラン",
    period: "期間",
    days: "日間",
    travelers: "旅行者数",
    total_budget: "総予算",
    schedule: "スケジュール",
    morning: "午前",
    afternoon: "午後",
    evening: "夜",
    no_schedule: "スケジュールはまだ作成されていません。",
    packing: "持ち物リスト",
    no_packing: "持ち物リストはまだ生成されていません。",
    budget: "予算概要",
    per_person: "一人当たり",
    per_day: "一日当たり",
};

pub fn export_plan(session: &PlannerSession, language: Language) -> ExportedPlan {
    let text = match language {
        Language::English => &ENGLISH,
        Language::Japanese => &JAPANESE,
    };
    let trip = &session.trip;
    let summary = BudgetSummary::new(trip, session.budget_breakdown());
    let mut doc = String::new();

    doc.push_str(&format!("# {}: {}\n\n", text.title, trip.destination));
    doc.push_str(&format!(
        "**{}:** {} - {} ({} {})\n",
        text.period,
        trip.start_date,
        trip.end_date,
        trip.day_count(),
        text.days
    ));
    doc.push_str(&format!("**{}:** {}\n", text.travelers, trip.travelers));
    doc.push_str(&format!(
        "**{}:** {}\n\n",
        text.total_budget,
        group_thousands(trip.budget)
    ));

    doc.push_str(&format!("## {}\n\n", text.schedule));
    if session.schedule.is_empty() {
        doc.push_str(&format!("{}\n\n", text.no_schedule));
    } else {
        for day in &session.schedule {
            doc.push_str(&format!("### {}\n", day.label));
            doc.push_str(&format!("- {}: {}\n", text.morning, day.morning));
            doc.push_str(&format!("- {}: {}\n", text.afternoon, day.afternoon));
            doc.push_str(&format!("- {}: {}\n\n", text.evening, day.evening));
        }
    }

    doc.push_str(&format!("## {}\n\n", text.packing));
    match &session.packing_list {
        Some(list) => doc.push_str(&format!("{}\n\n", list.text.trim_end())),
        None => doc.push_str(&format!("{}\n\n", text.no_packing)),
    }

    doc.push_str(&format!("## {}\n\n", text.budget));
    doc.push_str(&format!(
        "- {}: {}\n",
        text.total_budget,
        group_thousands(summary.total_budget)
    ));
    doc.push_str(&format!(
        "- {}: {}\n",
        text.per_person,
        group_thousands(summary.per_person)
    ));
    if let Some(per_day) = summary.per_day {
        doc.push_str(&format!("- {}: {}\n", text.per_day, group_thousands(per_day)));
    }

    ExportedPlan {
        file_name: file_name(&trip.destination, trip.start_date),
        content: doc,
    }
}

fn file_name(destination: &str, start: chrono::NaiveDate) -> String {
    let safe: String = destination
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_travel_plan_{}.md", safe, start.format("%Y%m%d"))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::packing::PackingList;
    use crate::models::schedule::DaySchedule;
    use crate::models::trip::{TravelPurpose, TripParameters};

    fn session(destination: &str, end: &str) -> PlannerSession {
        PlannerSession::new(TripParameters {
            destination: destination.to_string(),
            purpose: TravelPurpose::Sightseeing,
            home_location: None,
            start_date: "2025-10-10".parse().unwrap(),
            end_date: end.parse().unwrap(),
            budget: 150_000,
            travelers: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_plan_has_placeholders() {
        let plan = export_plan(&session("Kyoto", "2025-10-13"), Language::English);

        assert_eq!(plan.file_name, "Kyoto_travel_plan_20251010.md");
        assert!(plan.content.starts_with("# Travel plan: Kyoto\n"));
        assert!(plan.content.contains("**Period:** 2025-10-10 - 2025-10-13 (3 days)"));
        assert!(plan.content.contains("**Total budget:** 150,000"));
        assert!(plan.content.contains("The schedule has not been created yet."));
        assert!(plan.content.contains("The packing list has not been generated yet."));
        assert!(plan.content.contains("- Per person: 75,000"));
        assert!(plan.content.contains("- Per day: 50,000"));
    }

    #[test]
    fn test_schedule_and_packing_are_rendered() {
        let mut session = session("Kyoto", "2025-10-12");
        let mut day = DaySchedule::empty(1, "2025-10-10".parse().unwrap());
        day.morning = "Kiyomizu-dera".to_string();
        session.schedule = vec![day];
        session.packing_list = Some(PackingList {
            text: "Clothing:\n- Jacket\n".to_string(),
            categories: Vec::new(),
        });

        let plan = export_plan(&session, Language::English);
        assert!(plan.content.contains("### 10/10\n- Morning: Kiyomizu-dera\n- Afternoon: \n"));
        assert!(plan.content.contains("## Packing list\n\nClothing:\n- Jacket\n\n"));
    }

    #[test]
    fn test_same_day_trip_omits_per_day() {
        let plan = export_plan(&session("Nara", "2025-10-10"), Language::Japanese);
        assert!(plan.content.contains("# 旅行プラン: Nara"));
        assert!(!plan.content.contains("一日当たり"));
    }

    #[test]
    fn test_file_name_replaces_path_separators() {
        let start = "2025-01-02".parse().unwrap();
        assert_eq!(file_name("a/b\\c", start), "a_b_c_travel_plan_20250102.md");
        assert_eq!(file_name("京都", start), "京都_travel_plan_20250102.md");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::{DayMatching, Language};
use crate::models::schedule::DaySchedule;

/// A day block as written by the model, before it is placed on the calendar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScheduleBlock {
    pub date_label: String,
    pub morning: String,
    pub afternoon: String,
    pub night: String,
}

impl ScheduleBlock {
    fn is_empty(&self) -> bool {
        self.date_label.is_empty()
            && self.morning.is_empty()
            && self.afternoon.is_empty()
            && self.night.is_empty()
    }
}

/// Label tokens that introduce each field, matched ASCII case-insensitively.
pub struct ScheduleLabels {
    pub date: &'static [&'static str],
    pub morning: &'static [&'static str],
    pub afternoon: &'static [&'static str],
    pub night: &'static [&'static str],
}

const ENGLISH_LABELS: ScheduleLabels = ScheduleLabels {
    date: &["date:", "date："],
    morning: &["morning:", "morning："],
    afternoon: &["afternoon:", "afternoon："],
    night: &["night:", "night：", "evening:", "evening："],
};

const JAPANESE_LABELS: ScheduleLabels = ScheduleLabels {
    date: &["日付:", "日付："],
    morning: &["午前:", "午前："],
    afternoon: &["午後:", "午後："],
    night: &["夜:", "夜："],
};

impl ScheduleLabels {
    pub fn for_language(language: Language) -> &'static ScheduleLabels {
        match language {
            Language::English => &ENGLISH_LABELS,
            Language::Japanese => &JAPANESE_LABELS,
        }
    }
}

enum Field {
    Date,
    Morning,
    Afternoon,
    Night,
}

/// Splits a generated schedule into day blocks. Never fails: unlabelled lines
/// are ignored and at most `cap` blocks are returned.
pub fn parse_schedule(text: &str, labels: &ScheduleLabels, cap: usize) -> Vec<ScheduleBlock> {
    let mut blocks = Vec::new();
    let mut current = ScheduleBlock::default();

    for line in text.lines() {
        let Some((field, value)) = match_line(line, labels) else {
            continue;
        };
        match field {
            Field::Date => {
                let finished = std::mem::take(&mut current);
                if !finished.is_empty() {
                    blocks.push(finished);
                }
                current.date_label = value;
            }
            Field::Morning => current.morning = value,
            Field::Afternoon => current.afternoon = value,
            Field::Night => current.night = value,
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks.truncate(cap);
    blocks
}

fn match_line(line: &str, labels: &ScheduleLabels) -> Option<(Field, String)> {
    let folded = line.to_ascii_lowercase();
    let candidates = [
        (labels.date, Field::Date),
        (labels.morning, Field::Morning),
        (labels.afternoon, Field::Afternoon),
        (labels.night, Field::Night),
    ];

    for (tokens, field) in candidates {
        for token in tokens {
            // ASCII folding keeps byte offsets, so the index is valid in `line`.
            if let Some(index) = folded.find(token) {
                let value = &line[index + token.len()..];
                return Some((field, clean_value(value)));
            }
        }
    }
    None
}

fn clean_value(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '*')
        .to_string()
}

/// Places parsed blocks onto the trip's calendar. Exactly
/// `min(day_count, cap)` days are returned; days without a block stay empty.
pub fn align_to_calendar(
    blocks: &[ScheduleBlock],
    start: NaiveDate,
    day_count: u32,
    cap: usize,
    matching: DayMatching,
) -> Vec<DaySchedule> {
    let shown = (day_count as usize).min(cap);
    let mut days: Vec<DaySchedule> = (0..shown)
        .map(|i| DaySchedule::empty(i as u32 + 1, start + Duration::days(i as i64)))
        .collect();

    let mut placed = vec![false; shown];
    let mut leftovers = Vec::new();

    match matching {
        DayMatching::Positional => leftovers.extend(blocks.iter()),
        DayMatching::DateLabel => {
            for block in blocks {
                let slot = parse_label_date(&block.date_label, start)
                    .and_then(|date| days.iter().position(|d| d.date == date))
                    .filter(|&i| !placed[i]);
                match slot {
                    Some(i) => {
                        fill(&mut days[i], block);
                        placed[i] = true;
                    }
                    None => leftovers.push(block),
                }
            }
        }
    }

    let free = (0..shown).filter(|&i| !placed[i]).collect::<Vec<_>>();
    for (i, block) in free.into_iter().zip(leftovers) {
        fill(&mut days[i], block);
    }
    days
}

fn fill(day: &mut DaySchedule, block: &ScheduleBlock) {
    day.morning = block.morning.clone();
    day.afternoon = block.afternoon.clone();
    day.evening = block.night.clone();
}

/// Reads a date out of a free-form label such as "2025-05-01 (Thu)",
/// "05/01", "2025年5月1日" or "5月1日". Labels without a year take the year
/// of the trip start.
fn parse_label_date(label: &str, start: NaiveDate) -> Option<NaiveDate> {
    let numbers: Vec<u32> = label
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect();

    match numbers.as_slice() {
        [year, month, day, ..] if *year >= 1000 => NaiveDate::from_ymd_opt(*year as i32, *month, *day),
        [month, day, ..] => NaiveDate::from_ymd_opt(start.year(), *month, *day),
        _ => None,
    }
}

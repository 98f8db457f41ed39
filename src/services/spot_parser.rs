use std::sync::LazyLock;

use regex::Regex;

use crate::models::spot::Spot;

const BULLETS: &[char] = &['-', '*', '•', '・'];
const SEPARATORS: &[char] = &[':', '：'];

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(?P<name>.+)$").expect("ordinal pattern is valid"));

/// Turns a bulleted "name:description" answer into spots, one per non-blank
/// line. Lines that don't follow the format become a spot named after the
/// whole line.
pub fn parse_spots(text: &str) -> Vec<Spot> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Spot> {
    let entry = line.trim();
    if entry.is_empty() {
        return None;
    }
    let entry = strip_bullet(entry);

    let (head, description) = match entry.split_once(SEPARATORS) {
        Some((head, description)) => (head.trim(), description.trim()),
        None => (entry, ""),
    };

    let name = match ORDINAL.captures(head) {
        Some(caps) => caps["name"].trim().to_string(),
        None => head.to_string(),
    };
    let name = strip_emphasis(&name);
    let description = strip_emphasis(description);

    if name.is_empty() {
        return Some(Spot::new(entry, ""));
    }
    Some(Spot::new(name, description))
}

fn strip_bullet(entry: &str) -> &str {
    // A "**bold**" name starts with the same glyph as a "* " bullet.
    if entry.starts_with("**") {
        return entry;
    }
    entry.trim_start_matches(BULLETS).trim_start()
}

fn strip_emphasis(text: &str) -> String {
    text.trim_matches('*').trim().to_string()
}

use crate::models::packing::PackingCategory;

const BULLETS: &[char] = &['-', '*', '•', '・'];
const FALLBACK_CATEGORY: &str = "Other";

/// Groups a generated packing list into categories. A non-bullet line ending
/// in a colon opens a category; everything else is an item of the category
/// that is currently open.
pub fn parse_packing_list(text: &str) -> Vec<PackingCategory> {
    let mut categories: Vec<PackingCategory> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let is_bullet = trimmed.starts_with(BULLETS) && !trimmed.starts_with("**");
        if !is_bullet {
            if let Some(name) = category_header(trimmed) {
                categories.push(PackingCategory {
                    name,
                    items: Vec::new(),
                });
                continue;
            }
        }

        let item = trimmed
            .trim_start_matches(BULLETS)
            .trim()
            .trim_matches('*')
            .trim();
        if item.is_empty() {
            continue;
        }

        if categories.is_empty() {
            categories.push(PackingCategory {
                name: FALLBACK_CATEGORY.to_string(),
                items: Vec::new(),
            });
        }
        if let Some(current) = categories.last_mut() {
            current.items.push(item.to_string());
        }
    }

    categories
}

fn category_header(line: &str) -> Option<String> {
    let stripped = line
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim();
    let name = stripped
        .strip_suffix(':')
        .or_else(|| stripped.strip_suffix('：'))?
        .trim()
        .trim_matches('*')
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

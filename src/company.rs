use std::sync::LazyLock;

use regex::Regex;

static BRACKET_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());
static TOPIC_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^topic:\s*").unwrap());

const UNKNOWN_COMPANY: &str = "Unknown";

/// Short company label from a thread title: strip `[...]` tags and a
/// leading `topic:`, keep the first word, upper-case its first letter.
pub fn company_name(title: &str) -> String {
    let untagged = BRACKET_TAG_RE.replace_all(title, "");
    let stripped = TOPIC_PREFIX_RE.replace(untagged.trim(), "");

    match stripped.split_whitespace().next() {
        Some(word) => capitalize_first(word),
        None => UNKNOWN_COMPANY.to_string(),
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

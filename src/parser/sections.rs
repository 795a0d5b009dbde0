use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Roll numbers are exactly this many digits, bounded by non-digits.
const ROLL_NUMBER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Selected,
    Waitlisted,
    UnderReview,
}

/// Per-section roll-number tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub selected: usize,
    pub waitlisted: usize,
    pub under_review: usize,
}

impl SectionCounts {
    pub fn add(&mut self, section: Section, n: usize) {
        match section {
            Section::Selected => self.selected += n,
            Section::Waitlisted => self.waitlisted += n,
            Section::UnderReview => self.under_review += n,
        }
    }

    pub fn accumulate(&mut self, other: &SectionCounts) {
        self.selected += other.selected;
        self.waitlisted += other.waitlisted;
        self.under_review += other.under_review;
    }

    pub fn total(&self) -> usize {
        self.selected + self.waitlisted + self.under_review
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Lower-case substrings that switch the active section.
#[derive(Debug, Clone, Copy)]
pub struct SectionRules {
    pub waitlisted: &'static [&'static str],
    pub under_review: &'static [&'static str],
}

/// Line-by-line scan state. Starts in `Selected`; marker lines move it,
/// every other line adds its roll numbers to whatever section is active.
pub struct SectionScanner<'r> {
    rules: &'r SectionRules,
    current: Section,
    counts: SectionCounts,
}

impl<'r> SectionScanner<'r> {
    pub fn new(rules: &'r SectionRules) -> Self {
        SectionScanner {
            rules,
            current: Section::Selected,
            counts: SectionCounts::default(),
        }
    }

    pub fn feed(&mut self, line: &str) {
        // Marker lines are consumed whole: roll numbers on them never count.
        if let Some(next) = detect_transition(&line.to_lowercase(), self.rules) {
            self.current = next;
            return;
        }

        let found = count_roll_numbers(line);
        if found > 0 {
            self.counts.add(self.current, found);
        }
    }

    pub fn finish(self) -> SectionCounts {
        self.counts
    }
}

/// Waitlist markers win over under-review markers on the same line.
fn detect_transition(lower: &str, rules: &SectionRules) -> Option<Section> {
    if rules.waitlisted.iter().any(|k| lower.contains(k)) {
        Some(Section::Waitlisted)
    } else if rules.under_review.iter().any(|k| lower.contains(k)) {
        Some(Section::UnderReview)
    } else {
        None
    }
}

/// Number of 8-digit roll numbers on the line.
pub fn count_roll_numbers(line: &str) -> usize {
    DIGIT_RUN_RE
        .find_iter(line)
        .filter(|m| m.as_str().len() == ROLL_NUMBER_LEN)
        .count()
}

/// Classify one continuous run of lines, starting in `Selected`.
pub fn classify_lines<S: AsRef<str>>(lines: &[S], rules: &SectionRules) -> SectionCounts {
    let mut scanner = SectionScanner::new(rules);
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

// ── Tests ──

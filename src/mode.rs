use std::fmt;

use crate::parser::sections::SectionRules;

const OFFER_ROLE_WORDS: &[&str] = &["intern", "internship"];
const OFFER_WORDS: &[&str] = &["offer", "offers"];
const OFFER_EXCLUDED: &[&str] = &["ppo", "pre-placement", "shortlist", "interview"];
const PPO_WORDS: &[&str] = &["ppo", "pre-placement"];

const OFFER_RULES: SectionRules = SectionRules {
    waitlisted: &["waitlist"],
    under_review: &["under review", "shortlist"],
};
const PPO_RULES: SectionRules = SectionRules {
    waitlisted: &["waitlist"],
    under_review: &["under review"],
};

/// Which kind of forum thread a scrape run tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMode {
    /// Internship offer threads.
    Offers,
    /// Pre-placement offer threads.
    Ppos,
}

impl ScrapeMode {
    /// Title-based relevance. The PPO rule has no exclusion list.
    pub fn is_relevant(self, title: &str) -> bool {
        let lower = title.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        match self {
            ScrapeMode::Offers => {
                has_any(OFFER_ROLE_WORDS) && has_any(OFFER_WORDS) && !has_any(OFFER_EXCLUDED)
            }
            ScrapeMode::Ppos => has_any(PPO_WORDS),
        }
    }

    pub fn section_rules(self) -> &'static SectionRules {
        match self {
            ScrapeMode::Offers => &OFFER_RULES,
            ScrapeMode::Ppos => &PPO_RULES,
        }
    }

    /// PPO threads restart at `Selected` for every post; offer threads
    /// carry the active section across posts.
    pub fn resets_per_post(self) -> bool {
        matches!(self, ScrapeMode::Ppos)
    }

    pub fn totals_label(self) -> &'static str {
        match self {
            ScrapeMode::Offers => "Overall",
            ScrapeMode::Ppos => "Grand Total (all categories)",
        }
    }
}

impl fmt::Display for ScrapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeMode::Offers => f.write_str("internship offers"),
            ScrapeMode::Ppos => f.write_str("PPOs"),
        }
    }
}

pub mod lines;
pub mod listing;
pub mod sections;

use scraper::Html;

use crate::mode::ScrapeMode;
use sections::{classify_lines, SectionCounts};

/// Thread page → post lines → section tallies.
pub fn count_thread(html: &str, mode: ScrapeMode) -> SectionCounts {
    let document = Html::parse_document(html);
    let posts = lines::post_lines(&document);
    let rules = mode.section_rules();

    if !mode.resets_per_post() {
        return classify_lines(&posts.concat(), rules);
    }

    let mut counts = SectionCounts::default();
    for post in &posts {
        counts.accumulate(&classify_lines(post, rules));
    }
    counts
}

// ── Tests ──

use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::company::company_name;
use crate::fetch::{FetchError, PageSource};
use crate::mode::ScrapeMode;
use crate::parser::count_thread;
use crate::parser::listing::extract_threads;
use crate::parser::sections::SectionCounts;
use crate::settings::Settings;

/// Everything one scrape run produced. Built fresh per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    pub mode: ScrapeMode,
    pub companies: BTreeMap<String, SectionCounts>,
    pub totals: SectionCounts,
    pub threads_checked: usize,
}

impl ScrapeReport {
    pub fn new(mode: ScrapeMode) -> Self {
        ScrapeReport {
            mode,
            companies: BTreeMap::new(),
            totals: SectionCounts::default(),
            threads_checked: 0,
        }
    }

    /// Add one thread's counts under `company` and into the run totals.
    pub fn record(&mut self, company: String, counts: &SectionCounts) {
        self.companies.entry(company).or_default().accumulate(counts);
        self.totals.accumulate(counts);
    }
}

/// Walk listing pages 1..=max_pages in order, tally every relevant thread.
/// Any fetch failure aborts the whole run.
pub fn scrape(
    source: &dyn PageSource,
    settings: &Settings,
    mode: ScrapeMode,
) -> Result<ScrapeReport, FetchError> {
    let pb = ProgressBar::new(u64::from(settings.max_pages));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let result = scrape_pages(source, settings, mode, &pb);
    pb.finish_and_clear();

    if let Ok(report) = &result {
        info!(
            "Scraped {}: {} threads checked, {} companies, {} roll numbers",
            mode,
            report.threads_checked,
            report.companies.len(),
            report.totals.total()
        );
    }
    result
}

fn scrape_pages(
    source: &dyn PageSource,
    settings: &Settings,
    mode: ScrapeMode,
    pb: &ProgressBar,
) -> Result<ScrapeReport, FetchError> {
    let mut report = ScrapeReport::new(mode);

    for page in 1..=settings.max_pages {
        pb.set_message(format!("({})", mode));
        info!(page, "Scraping listing page");
        let listing = source.fetch(&settings.listing_url(page), mode)?;

        for entry in extract_threads(&listing, &settings.base_url) {
            if !mode.is_relevant(&entry.title) {
                continue;
            }

            info!(title = %entry.title, "Checking thread");
            let thread = source.fetch(&entry.url, mode)?;
            let counts = count_thread(&thread, mode);
            report.threads_checked += 1;

            if counts.is_empty() {
                debug!(title = %entry.title, "no roll numbers found");
                continue;
            }
            report.record(company_name(&entry.title), &counts);
        }

        pb.inc(1);
    }

    Ok(report)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::fetch::fixtures::FixtureSource;
    use crate::settings::Settings;

    pub const BASE: &str = "https://forum.example.edu";

    pub fn settings(max_pages: u32) -> Settings {
        Settings {
            base_url: BASE.to_string(),
            listing_path: "/forum/c/notice-board/".to_string(),
            max_pages,
            bind: "127.0.0.1:0".to_string(),
            internship_session_id: Some("intern".to_string()),
            ppo_session_id: Some("ppo".to_string()),
        }
    }

    fn file(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn post(body: &str) -> String {
        format!(r#"<table><tr><td class="post-content">{}</td></tr></table>"#, body)
    }

    /// Two listing pages with offer and PPO threads.
    pub fn forum() -> FixtureSource {
        let listing = |page: u32| format!("{}/forum/c/notice-board/?page={}", BASE, page);
        let thread = |slug: &str| format!("{}/forum/t/{}/", BASE, slug);

        FixtureSource::default()
            .with_page(&listing(1), file("listing_page1"))
            .with_page(&listing(2), file("listing_page2"))
            .with_page(&thread("google-internship-offers"), file("thread_google"))
            .with_page(&thread("microsoft-ppo"), file("thread_microsoft_ppo"))
            .with_page(&thread("amazon-ppo-offers"), post("21075041<br>21075042"))
            .with_page(
                &thread("amazon-internship-offers"),
                post("Selected:<br>21075021<br>21075022<br>Shortlist<br>21075023"),
            )
            .with_page(&thread("google-internship-offers-2"), post("21075031"))
            .with_page(&thread("flipkart-intern-offers"), post("No offers yet, stay tuned."))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::fixtures::{forum, settings, BASE};
    use super::*;
    use crate::fetch::fixtures::FixtureSource;

    fn counts(selected: usize, waitlisted: usize, under_review: usize) -> SectionCounts {
        SectionCounts {
            selected,
            waitlisted,
            under_review,
        }
    }

    #[test]
    fn offers_across_two_pages() {
        let report = scrape(&forum(), &settings(2), ScrapeMode::Offers).unwrap();
        assert_eq!(report.threads_checked, 4);
        assert_eq!(report.companies.len(), 2);
        assert_eq!(report.companies["Google"], counts(4, 2, 1));
        assert_eq!(report.companies["Amazon"], counts(2, 0, 1));
        assert!(!report.companies.contains_key("Flipkart"));
        assert_eq!(report.totals, counts(6, 2, 2));
        assert_eq!(report.totals.total(), 10);
    }

    #[test]
    fn ppos_across_two_pages() {
        let report = scrape(&forum(), &settings(2), ScrapeMode::Ppos).unwrap();
        assert_eq!(report.threads_checked, 2);
        assert_eq!(report.companies["Amazon"], counts(2, 0, 0));
        assert_eq!(report.companies["Pre-Placement"], counts(3, 1, 1));
        assert_eq!(report.totals, counts(5, 1, 1));
    }

    #[test]
    fn fetches_follow_listing_order_with_mode_session() {
        let source = forum();
        scrape(&source, &settings(1), ScrapeMode::Ppos).unwrap();
        let urls: Vec<String> = source.requested().into_iter().map(|(u, _)| u).collect();
        assert_eq!(
            urls,
            vec![
                format!("{BASE}/forum/c/notice-board/?page=1"),
                format!("{BASE}/forum/t/amazon-ppo-offers/"),
                format!("{BASE}/forum/t/microsoft-ppo/"),
            ]
        );
        assert!(source.requested().iter().all(|(_, m)| *m == ScrapeMode::Ppos));
    }

    #[test]
    fn missing_listing_page_fails_the_run() {
        let err = scrape(&forum(), &settings(3), ScrapeMode::Offers).unwrap_err();
        assert!(matches!(err, FetchError::Status { ref url, .. } if url.ends_with("?page=3")));
    }

    #[test]
    fn missing_thread_fails_the_run() {
        let listing = r#"<table><tr class="topic-row"><td class="topic-name">
            <a href="/forum/t/gone/">Zomato Internship Offers</a></td></tr></table>"#;
        let source = FixtureSource::default()
            .with_page(&format!("{BASE}/forum/c/notice-board/?page=1"), listing);
        let err = scrape(&source, &settings(1), ScrapeMode::Offers).unwrap_err();
        assert!(err.to_string().contains("/forum/t/gone/"));
    }

    #[test]
    fn repeated_thread_counts_twice() {
        let listing = r#"<table><tr class="topic-row"><td class="topic-name">
            <a href="/forum/t/repeat/">Zomato Internship Offers</a></td></tr></table>"#;
        let source = FixtureSource::default()
            .with_page(&format!("{BASE}/forum/c/notice-board/?page=1"), listing)
            .with_page(&format!("{BASE}/forum/c/notice-board/?page=2"), listing)
            .with_page(
                &format!("{BASE}/forum/t/repeat/"),
                r#"<table><tr><td class="post-content">21075001</td></tr></table>"#,
            );
        let report = scrape(&source, &settings(2), ScrapeMode::Offers).unwrap();
        assert_eq!(report.companies["Zomato"].selected, 2);
    }

    #[test]
    fn runs_over_frozen_input_are_identical() {
        let first = scrape(&forum(), &settings(2), ScrapeMode::Offers).unwrap();
        let second = scrape(&forum(), &settings(2), ScrapeMode::Offers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_pages_is_an_empty_report() {
        let source = FixtureSource::default();
        let report = scrape(&source, &settings(0), ScrapeMode::Offers).unwrap();
        assert_eq!(report, ScrapeReport::new(ScrapeMode::Offers));
        assert!(source.requested().is_empty());
    }
}

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

static TOPIC_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr.topic-row").unwrap());
static TOPIC_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.topic-name a").unwrap());

/// One row of the notice-board listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub title: String,
    pub url: String,
}

/// Pull (title, absolute url) pairs from a listing page, in page order.
/// Rows without a title link or href are skipped.
pub fn extract_threads(html: &str, base_url: &str) -> Vec<ThreadEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    for row in document.select(&TOPIC_ROW) {
        let Some(link) = row.select(&TOPIC_LINK).next() else {
            debug!("listing row without title link, skipping");
            continue;
        };
        let title = link
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let Some(href) = link.value().attr("href") else {
            debug!(title = %title, "title link without href, skipping");
            continue;
        };
        entries.push(ThreadEntry {
            title,
            url: resolve_href(base_url, href),
        });
    }

    entries
}

fn resolve_href(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}{}", base_url, href)
    }
}

// ── Tests ──

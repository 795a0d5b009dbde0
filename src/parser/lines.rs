use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

static POST_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.post-content").unwrap());

/// Lines of every post content block on a thread page, one Vec per post.
pub fn post_lines(document: &Html) -> Vec<Vec<String>> {
    document.select(&POST_CONTENT).map(block_lines).collect()
}

/// Plain-text lines of one post block. `<br>` is the line separator.
pub fn block_lines(block: ElementRef<'_>) -> Vec<String> {
    let mut text = String::new();
    for node in block.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    split_lines(&text)
}

/// Split on newlines, trim, drop blanks.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──
